//! Dividend and bonus history reduction.
//!
//! Turns a company's historical benefit events into two scalars: the average
//! annual rate over the covered fiscal span and the probability (in percent)
//! of an event happening in any given year of that span.

use regex::Regex;

/// Failures while parsing or reducing benefit history.
#[derive(thiserror::Error, Debug)]
pub enum BenefitError {
    /// The fiscal-year label did not contain a `start-end` pair. Upstream
    /// data is malformed; the whole record build fails.
    #[error("malformed fiscal year label '{0}'")]
    MalformedLabel(String),
    /// A rate cell could not be read as a number.
    #[error("unparsable rate value '{0}'")]
    MalformedRate(String),
    /// All events fall into a single fiscal year, so the span is zero and
    /// the averages are undefined.
    #[error("fiscal year span is zero")]
    ZeroSpan,
}

/// One historical dividend payout or bonus share issuance.
#[derive(Debug, Clone, PartialEq)]
pub struct BenefitEvent {
    pub start_year: i32,
    pub end_year: i32,
    pub percent: f64,
}

/// The two scalars a benefit history reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BenefitSummary {
    pub rate: f64,
    pub probability: f64,
}

impl BenefitSummary {
    /// The default for companies with no event history.
    pub const ZERO: Self = Self {
        rate: 0.0,
        probability: 0.0,
    };
}

/// Parses a fiscal-year label of the form `start-end`, e.g. `" 079-080"`
/// or `"(FY: 079-080)"`, into its integer pair.
pub fn parse_fiscal_label(label: &str) -> Result<(i32, i32), BenefitError> {
    let re = Regex::new(r"(\d+)-(\d+)").expect("static pattern");
    let caps = re
        .captures(label)
        .ok_or_else(|| BenefitError::MalformedLabel(label.to_string()))?;
    let start = caps[1]
        .parse()
        .map_err(|_| BenefitError::MalformedLabel(label.to_string()))?;
    let end = caps[2]
        .parse()
        .map_err(|_| BenefitError::MalformedLabel(label.to_string()))?;
    Ok((start, end))
}

/// Parses a rate cell such as `"10.53%"` or `"1,200%"` into a float.
pub fn parse_rate(raw: &str) -> Result<f64, BenefitError> {
    raw.trim()
        .trim_end_matches('%')
        .replace(',', "")
        .parse()
        .map_err(|_| BenefitError::MalformedRate(raw.to_string()))
}

/// Collapses duplicate events. At most one event survives per distinct
/// (start, end) fiscal pair; when the same year is reported twice, the
/// higher rate wins.
pub fn dedup_events(events: Vec<BenefitEvent>) -> Vec<BenefitEvent> {
    let mut by_span: std::collections::BTreeMap<(i32, i32), BenefitEvent> =
        std::collections::BTreeMap::new();
    for event in events {
        let key = (event.start_year, event.end_year);
        match by_span.get(&key) {
            Some(existing) if existing.percent >= event.percent => {}
            _ => {
                by_span.insert(key, event);
            }
        }
    }
    by_span.into_values().collect()
}

/// Reduces a deduplicated event list to its summary scalars.
///
/// `rate` is the summed percent spread over the covered span of fiscal
/// years, `probability` the event count over that span, as a percentage.
/// Both are rounded to two decimals. The empty list must be short-circuited
/// by the caller to [`BenefitSummary::ZERO`]; a single-year span fails with
/// [`BenefitError::ZeroSpan`].
pub fn summarize(events: &[BenefitEvent]) -> Result<BenefitSummary, BenefitError> {
    let start = events.iter().map(|e| e.start_year).min().unwrap_or(0);
    let end = events.iter().map(|e| e.end_year).max().unwrap_or(0);
    let span = end - start;
    if span == 0 {
        return Err(BenefitError::ZeroSpan);
    }
    let total: f64 = events.iter().map(|e| e.percent).sum();
    Ok(BenefitSummary {
        rate: round2(total / span as f64),
        probability: round2(events.len() as f64 / span as f64 * 100.0),
    })
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
