//! Record and cache types shared across the library.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Columns the cache file must carry to be considered valid. A file missing
/// any of these is treated as no cache at all and forces a full re-fetch.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Symbol",
    "Sector",
    "Market Price",
    "Book Value",
    "PBV",
    "EPS",
    "P/E Ratio",
    "avg_dvnd_rate",
    "avg_dvnd_prob",
    "avg_bonus_prob",
    "scrape_date",
];

/// Latest known fundamentals snapshot for one listed company.
///
/// Market fields keep their scraped text form: EPS carries a fiscal-period
/// annotation and the one-year yield a percent sign. The filter layer
/// extracts numbers from them on demand. Serde renames match the cache file
/// header exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Market Price")]
    pub market_price: String,
    #[serde(rename = "Book Value")]
    pub book_value: String,
    #[serde(rename = "PBV")]
    pub pbv: String,
    #[serde(rename = "EPS")]
    pub eps: String,
    #[serde(rename = "P/E Ratio")]
    pub pe_ratio: String,
    #[serde(rename = "1 Year Yield", default)]
    pub year_yield: String,
    #[serde(rename = "avg_dvnd_rate")]
    pub avg_dvnd_rate: f64,
    #[serde(rename = "avg_dvnd_prob")]
    pub avg_dvnd_prob: f64,
    #[serde(rename = "avg_bonus_rate", default)]
    pub avg_bonus_rate: f64,
    #[serde(rename = "avg_bonus_prob")]
    pub avg_bonus_prob: f64,
    #[serde(rename = "scrape_date")]
    pub scrape_date: NaiveDate,
}

/// The full cached dataset, keyed by symbol. Keying guarantees the
/// one-record-per-symbol invariant; inserting a symbol twice replaces the
/// older row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cache {
    records: BTreeMap<String, CompanyRecord>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = CompanyRecord>) -> Self {
        let mut cache = Self::new();
        for record in records {
            cache.insert(record);
        }
        cache
    }

    pub fn insert(&mut self, record: CompanyRecord) {
        self.records.insert(record.symbol.clone(), record);
    }

    pub fn remove(&mut self, symbol: &str) -> Option<CompanyRecord> {
        self.records.remove(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&CompanyRecord> {
        self.records.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.records.contains_key(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(|s| s.as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records.values()
    }

    pub fn into_records(self) -> impl Iterator<Item = CompanyRecord> {
        self.records.into_values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct sectors present in the cache, sorted.
    pub fn sectors(&self) -> Vec<&str> {
        let mut sectors: Vec<&str> = self
            .records
            .values()
            .map(|r| r.sector.as_str())
            .collect();
        sectors.sort_unstable();
        sectors.dedup();
        sectors
    }
}
