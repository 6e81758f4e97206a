//! Minimal HTML table extraction for Merolagani pages.
//!
//! The pages are server-rendered ASP.NET with flat, non-nested tables, so a
//! regex scan is enough; no DOM parser is pulled in for this.

use regex::Regex;

use crate::Error;

/// One `<table>` element, split into a header row and data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Index of the column whose header equals `name` (after tag stripping).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Extracts every table on the page, in document order.
pub fn extract_tables(html: &str) -> Result<Vec<HtmlTable>, Error> {
    let table_re = compile(r"(?is)<table\b[^>]*>.*?</table>")?;
    let row_re = compile(r"(?is)<tr\b[^>]*>.*?</tr>")?;
    let cell_re = compile(r"(?is)<t[hd]\b[^>]*>(.*?)</t[hd]>")?;

    let mut tables = Vec::new();
    for table_match in table_re.find_iter(html) {
        let mut headers = Vec::new();
        let mut rows = Vec::new();
        for (i, row_match) in row_re.find_iter(table_match.as_str()).enumerate() {
            let cells: Vec<String> = cell_re
                .captures_iter(row_match.as_str())
                .map(|cap| strip_tags(&cap[1]))
                .collect();
            if cells.is_empty() {
                continue;
            }
            if i == 0 {
                headers = cells;
            } else {
                rows.push(cells);
            }
        }
        tables.push(HtmlTable { headers, rows });
    }
    Ok(tables)
}

/// Extracts the visible text of every element carrying the given CSS class.
pub fn extract_class_texts(html: &str, class: &str) -> Result<Vec<String>, Error> {
    let pattern = format!(
        r#"(?is)<\w+[^>]*class="[^"]*\b{}\b[^"]*"[^>]*>(.*?)</"#,
        regex::escape(class)
    );
    let re = compile(&pattern)?;
    Ok(re
        .captures_iter(html)
        .map(|cap| strip_tags(&cap[1]))
        .filter(|text| !text.is_empty())
        .collect())
}

/// Drops markup from an HTML fragment, decodes the handful of entities the
/// site emits, and collapses runs of whitespace.
pub fn strip_tags(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::Parse(format!("regex compile error: {}", e)))
}
