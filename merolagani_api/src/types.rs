//! Raw shapes returned by the provider, before any normalization.

use std::collections::BTreeMap;

/// A valid company detail page carries at least this many tables:
/// profile, dividend history, bonus history, and price history.
pub const MIN_DETAIL_TABLES: usize = 4;

/// The market-wide catalog scraped from the company list page.
#[derive(Debug, Clone, Default)]
pub struct CompanyCatalog {
    /// Sector names in page order.
    pub sectors: Vec<String>,
    /// Symbols listed under each sector.
    pub companies: BTreeMap<String, Vec<String>>,
}

impl CompanyCatalog {
    /// All symbols across every sector, in sector page order.
    pub fn all_symbols(&self) -> Vec<String> {
        self.sectors
            .iter()
            .filter_map(|sector| self.companies.get(sector))
            .flatten()
            .cloned()
            .collect()
    }

    /// Symbols for one sector, or `None` if the sector is unknown.
    pub fn symbols_for(&self, sector: &str) -> Option<&[String]> {
        self.companies.get(sector).map(|symbols| symbols.as_slice())
    }
}

/// One row of a dividend or bonus history table, cells as scraped.
///
/// Which cell actually holds the fiscal-year label differs between the two
/// tables upstream; the record builder applies each table's convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenefitRow {
    pub fiscal_year: String,
    pub value: String,
}

/// The raw tables of one company detail page.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    /// Key/value rows of the profile block (sector, prices, ratios).
    pub profile: Vec<(String, String)>,
    pub dividends: Vec<BenefitRow>,
    pub bonuses: Vec<BenefitRow>,
}

impl RawTables {
    /// Looks up a profile field by its label.
    pub fn profile_field(&self, key: &str) -> Option<&str> {
        self.profile
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
