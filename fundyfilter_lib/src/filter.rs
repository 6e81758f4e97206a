//! Predicate filtering and sorting over cached records.
//!
//! Criteria are conjunctive: a record must pass every one. Blank or
//! unparsable criteria are dropped before evaluation, so the surface layer
//! can pass raw user input through.

use std::cmp::Ordering;

use crate::model::{Cache, CompanyRecord};

/// Comparison operator of one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Gt,
    Eq,
}

impl CmpOp {
    fn matches(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Gt => lhs > rhs,
            Self::Eq => lhs == rhs,
        }
    }
}

/// The numeric views of a record the filter layer understands. Text fields
/// like EPS and the one-year yield are reduced to their numeric core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    MarketPrice,
    BookValue,
    Pbv,
    Eps,
    PeRatio,
    AvgDvndRate,
    AvgDvndProb,
    AvgBonusRate,
    AvgBonusProb,
    YearYield,
}

impl NumericColumn {
    /// Extracts this column's numeric value from a record, or `None` when
    /// the scraped text does not contain one.
    pub fn value_of(self, record: &CompanyRecord) -> Option<f64> {
        match self {
            Self::MarketPrice => parse_number(&record.market_price),
            Self::BookValue => parse_number(&record.book_value),
            Self::Pbv => parse_number(&record.pbv),
            // EPS text is "47.28 (FY:079-080, Q:2)"; only the leading
            // number compares.
            Self::Eps => parse_number(record.eps.split_whitespace().next()?),
            Self::PeRatio => parse_number(&record.pe_ratio),
            Self::AvgDvndRate => Some(record.avg_dvnd_rate),
            Self::AvgDvndProb => Some(record.avg_dvnd_prob),
            Self::AvgBonusRate => Some(record.avg_bonus_rate),
            Self::AvgBonusProb => Some(record.avg_bonus_prob),
            Self::YearYield => parse_number(record.year_yield.trim_end_matches('%')),
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().replace(',', "").parse().ok()
}

/// One numeric condition, e.g. `PBV < 1.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criterion {
    pub column: NumericColumn,
    pub op: CmpOp,
    pub value: f64,
}

impl Criterion {
    /// Parses a user expression such as `"<12.5"`, `"> 5"`, or `"=0"`.
    /// Blank input or anything unparsable yields `None` and the criterion
    /// is dropped.
    pub fn parse(column: NumericColumn, expr: &str) -> Option<Self> {
        let expr = expr.trim();
        let (op, rest) = match expr.chars().next()? {
            '<' => (CmpOp::Lt, &expr[1..]),
            '>' => (CmpOp::Gt, &expr[1..]),
            '=' => (CmpOp::Eq, &expr[1..]),
            _ => return None,
        };
        let value = rest.trim().parse().ok()?;
        Some(Self { column, op, value })
    }
}

/// A full filter query: optional sector equality plus numeric conditions,
/// all applied conjunctively.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub sector: Option<String>,
    pub numeric: Vec<Criterion>,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.sector.is_none() && self.numeric.is_empty()
    }

    /// True when the record passes every criterion. A record whose text
    /// field holds no number for a compared column fails that criterion.
    pub fn matches(&self, record: &CompanyRecord) -> bool {
        if let Some(sector) = &self.sector {
            if &record.sector != sector {
                return false;
            }
        }
        self.numeric.iter().all(|criterion| {
            criterion
                .column
                .value_of(record)
                .map(|value| criterion.op.matches(value, criterion.value))
                .unwrap_or(false)
        })
    }

    /// Filters the cache into an owned, symbol-ordered row set.
    pub fn apply(&self, cache: &Cache) -> Vec<CompanyRecord> {
        cache
            .records()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

/// Column to sort result rows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Symbol,
    Sector,
    Numeric(NumericColumn),
}

impl SortKey {
    /// Parses a CLI column name.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name.trim().to_lowercase().as_str() {
            "symbol" => Self::Symbol,
            "sector" => Self::Sector,
            "price" => Self::Numeric(NumericColumn::MarketPrice),
            "book-value" => Self::Numeric(NumericColumn::BookValue),
            "pbv" => Self::Numeric(NumericColumn::Pbv),
            "eps" => Self::Numeric(NumericColumn::Eps),
            "pe" => Self::Numeric(NumericColumn::PeRatio),
            "dvnd-rate" => Self::Numeric(NumericColumn::AvgDvndRate),
            "dvnd-prob" => Self::Numeric(NumericColumn::AvgDvndProb),
            "bonus-rate" => Self::Numeric(NumericColumn::AvgBonusRate),
            "bonus-prob" => Self::Numeric(NumericColumn::AvgBonusProb),
            "yield" => Self::Numeric(NumericColumn::YearYield),
            _ => return None,
        })
    }
}

/// Stable sort of result rows. Rows without a numeric value for the key
/// sort to the end regardless of direction.
pub fn sort_records(records: &mut [CompanyRecord], key: SortKey, descending: bool) {
    records.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Symbol => a.symbol.cmp(&b.symbol),
            SortKey::Sector => a.sector.cmp(&b.sector),
            SortKey::Numeric(column) => match (column.value_of(a), column.value_of(b)) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
