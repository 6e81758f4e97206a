//! HTTP client for the Merolagani company pages.

use std::time::Duration;

use crate::html::{extract_class_texts, extract_tables, HtmlTable};
use crate::types::{BenefitRow, CompanyCatalog, RawTables, MIN_DETAIL_TABLES};
use crate::user_agent::get_user_agent;
use crate::Error;

/// Only the leading rows of the profile table hold company fundamentals;
/// everything below is announcements and unrelated widgets.
const PROFILE_ROWS: usize = 12;

/// Scraping client for merolagani.com.
///
/// Sends requests with browser-like headers and a randomized user agent to
/// avoid being served the empty non-browser shell. All fetches share one
/// `reqwest::Client` with a 30-second timeout.
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client pointing at the production site.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url("https://merolagani.com")
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Fetches the company list page and returns sectors with their symbols.
    ///
    /// Sector panels and sector tables appear pairwise in page order; panels
    /// beyond the last table are decorative and dropped.
    pub async fn company_catalog(&self) -> Result<CompanyCatalog, Error> {
        let url = format!("{}/CompanyList.aspx", self.base_url);
        let html = self.fetch_html(&url).await?;

        let mut sectors = extract_class_texts(&html, "panel-title")?;
        if sectors.is_empty() {
            return Err(Error::MissingSectors);
        }

        let tables = extract_tables(&html)?;
        let mut catalog = CompanyCatalog::default();
        for (sector, table) in sectors.iter().zip(tables.iter()) {
            catalog
                .companies
                .insert(sector.clone(), symbol_column(sector, table)?);
        }
        sectors.truncate(catalog.companies.len());
        catalog.sectors = sectors;
        Ok(catalog)
    }

    /// Fetches one company's detail page and splits it into raw tables.
    ///
    /// Fails with [`Error::NoTables`] when the page has no tables at all and
    /// [`Error::MissingTables`] when fewer than the expected count are
    /// present; both mean the symbol is broken or nonexistent.
    pub async fn company_detail(&self, symbol: &str) -> Result<RawTables, Error> {
        let url = format!(
            "{}/CompanyDetail.aspx?symbol={}",
            self.base_url,
            symbol.replace(' ', "%")
        );
        let html = self.fetch_html(&url).await?;

        let tables = extract_tables(&html)?;
        if tables.is_empty() {
            return Err(Error::NoTables {
                symbol: symbol.to_string(),
            });
        }
        if tables.len() < MIN_DETAIL_TABLES {
            return Err(Error::MissingTables {
                symbol: symbol.to_string(),
                found: tables.len(),
            });
        }

        Ok(RawTables {
            profile: profile_rows(&tables[0]),
            dividends: benefit_rows(symbol, &tables[1])?,
            bonuses: benefit_rows(symbol, &tables[2])?,
        })
    }

    async fn fetch_html(&self, url: &str) -> Result<String, Error> {
        tracing::debug!("fetching {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("referer", "https://www.google.com/")
            .header("upgrade-insecure-requests", "1")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::HttpStatus {
                status: resp.status(),
            });
        }

        Ok(resp.text().await?)
    }
}

/// Reads the `Symbol` column of one sector table.
fn symbol_column(sector: &str, table: &HtmlTable) -> Result<Vec<String>, Error> {
    let idx = table.column("Symbol").ok_or_else(|| {
        Error::Parse(format!("sector table for '{}' has no Symbol column", sector))
    })?;
    Ok(table
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .cloned()
        .collect())
}

/// Reads the profile block as key/value pairs.
///
/// The profile table has no header row, so the extractor's "header" is
/// really the first data row and is kept.
fn profile_rows(table: &HtmlTable) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    if table.headers.len() >= 2 {
        rows.push((table.headers[0].clone(), table.headers[1].clone()));
    }
    for row in &table.rows {
        if row.len() >= 2 {
            rows.push((row[0].clone(), row[1].clone()));
        }
    }
    rows.truncate(PROFILE_ROWS);
    rows
}

/// Reads a dividend or bonus history table, cells as scraped.
fn benefit_rows(symbol: &str, table: &HtmlTable) -> Result<Vec<BenefitRow>, Error> {
    let year_idx = table.column("Fiscal Year").ok_or_else(|| {
        Error::Parse(format!(
            "benefit table for {} has no Fiscal Year column",
            symbol
        ))
    })?;
    let value_idx = table
        .column("Value")
        .ok_or_else(|| Error::Parse(format!("benefit table for {} has no Value column", symbol)))?;

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            let fiscal_year = row.get(year_idx)?.clone();
            let value = row.get(value_idx)?.clone();
            Some(BenefitRow { fiscal_year, value })
        })
        .collect())
}
