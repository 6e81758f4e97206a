//! Assembles a normalized [`CompanyRecord`] from one symbol's raw tables.

use chrono::NaiveDateTime;
use merolagani_api::{BenefitRow, RawTables};

use crate::benefit::{
    dedup_events, parse_fiscal_label, parse_rate, summarize, BenefitError, BenefitEvent,
    BenefitSummary,
};
use crate::calendar::scrape_stamp;
use crate::model::CompanyRecord;

/// Failures while building a record. Any failure drops the whole record;
/// partially-valid records are never produced.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// The profile block lacks a field the record schema requires.
    #[error("company profile is missing the '{0}' field")]
    MissingField(&'static str),
    #[error(transparent)]
    Benefit(#[from] BenefitError),
}

/// Which of a benefit table's two columns holds the fiscal-year label.
///
/// Upstream, the dividend table carries the label in its `Value` column and
/// the rate in `Fiscal Year`; the bonus table is the straight mapping.
enum BenefitColumns {
    /// Label in `fiscal_year`, rate in `value` (bonus table).
    Straight,
    /// Label in `value`, rate in `fiscal_year` (dividend table).
    Swapped,
}

/// Builds the detail record for `symbol` from its scraped tables, stamping
/// the scrape date from the injected timestamp (back-dated on the weekly
/// rest day).
pub fn build_record(
    symbol: &str,
    tables: &RawTables,
    now: NaiveDateTime,
) -> Result<CompanyRecord, BuildError> {
    let dividends = summarize_table(&tables.dividends, BenefitColumns::Swapped)?;
    let bonuses = summarize_table(&tables.bonuses, BenefitColumns::Straight)?;

    Ok(CompanyRecord {
        symbol: symbol.to_string(),
        sector: profile_field(tables, "Sector")?,
        market_price: profile_field(tables, "Market Price")?,
        book_value: profile_field(tables, "Book Value")?,
        pbv: profile_field(tables, "PBV")?,
        eps: profile_field(tables, "EPS")?,
        pe_ratio: profile_field(tables, "P/E Ratio")?,
        year_yield: profile_field(tables, "1 Year Yield")?,
        avg_dvnd_rate: dividends.rate,
        avg_dvnd_prob: dividends.probability,
        avg_bonus_rate: bonuses.rate,
        avg_bonus_prob: bonuses.probability,
        scrape_date: scrape_stamp(now),
    })
}

fn profile_field(tables: &RawTables, key: &'static str) -> Result<String, BuildError> {
    tables
        .profile_field(key)
        .map(|v| v.to_string())
        .ok_or(BuildError::MissingField(key))
}

/// Parses one benefit table into events and reduces it. An empty table
/// short-circuits to zero without touching the summarizer.
fn summarize_table(
    rows: &[BenefitRow],
    columns: BenefitColumns,
) -> Result<BenefitSummary, BuildError> {
    if rows.is_empty() {
        return Ok(BenefitSummary::ZERO);
    }
    let events: Vec<BenefitEvent> = rows
        .iter()
        .map(|row| {
            let (label, rate) = match columns {
                BenefitColumns::Straight => (&row.fiscal_year, &row.value),
                BenefitColumns::Swapped => (&row.value, &row.fiscal_year),
            };
            let (start_year, end_year) = parse_fiscal_label(label)?;
            Ok(BenefitEvent {
                start_year,
                end_year,
                percent: parse_rate(rate)?,
            })
        })
        .collect::<Result<_, BenefitError>>()?;
    Ok(summarize(&dedup_events(events))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(fiscal_year: &str, value: &str) -> BenefitRow {
        BenefitRow {
            fiscal_year: fiscal_year.to_string(),
            value: value.to_string(),
        }
    }

    fn profile() -> Vec<(String, String)> {
        [
            ("Sector", "Commercial Banks"),
            ("Shares Outstanding", "180,000,000"),
            ("Market Price", "242.10"),
            ("% Change", "0.29 %"),
            ("1 Year Yield", "-20.91%"),
            ("EPS", "47.28 (FY:079-080, Q:2)"),
            ("P/E Ratio", "17.28"),
            ("Book Value", "512.92"),
            ("PBV", "1.59"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn now() -> NaiveDateTime {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2023, 4, 19)
            .unwrap()
            .and_hms_opt(11, 0, 0)
            .unwrap()
    }

    #[test]
    fn builds_full_record() {
        let tables = RawTables {
            profile: profile(),
            // Dividend cells are swapped upstream: rate under Fiscal Year,
            // label under Value.
            dividends: vec![row("10%", "078-079"), row("20%", "079-080")],
            bonuses: vec![row("078-079", "8%"), row("079-080", "4%")],
        };
        let record = build_record("NBL", &tables, now()).unwrap();
        assert_eq!(record.symbol, "NBL");
        assert_eq!(record.sector, "Commercial Banks");
        assert_eq!(record.market_price, "242.10");
        assert_eq!(record.avg_dvnd_rate, 15.0);
        assert_eq!(record.avg_dvnd_prob, 100.0);
        assert_eq!(record.avg_bonus_rate, 6.0);
        assert_eq!(record.avg_bonus_prob, 100.0);
        assert_eq!(
            record.scrape_date,
            NaiveDate::from_ymd_opt(2023, 4, 19).unwrap()
        );
    }

    #[test]
    fn empty_histories_default_to_zero() {
        let tables = RawTables {
            profile: profile(),
            dividends: vec![],
            bonuses: vec![],
        };
        let record = build_record("NBL", &tables, now()).unwrap();
        assert_eq!(record.avg_dvnd_rate, 0.0);
        assert_eq!(record.avg_dvnd_prob, 0.0);
        assert_eq!(record.avg_bonus_rate, 0.0);
        assert_eq!(record.avg_bonus_prob, 0.0);
    }

    #[test]
    fn duplicate_fiscal_years_keep_highest_rate() {
        let tables = RawTables {
            profile: profile(),
            dividends: vec![],
            bonuses: vec![row("078-079", "10%"), row("078-079", "25%")],
        };
        let record = build_record("NBL", &tables, now()).unwrap();
        assert_eq!(record.avg_bonus_rate, 25.0);
    }

    #[test]
    fn missing_profile_field_fails_build() {
        let mut fields = profile();
        fields.retain(|(k, _)| k != "PBV");
        let tables = RawTables {
            profile: fields,
            dividends: vec![],
            bonuses: vec![],
        };
        assert!(matches!(
            build_record("NBL", &tables, now()),
            Err(BuildError::MissingField("PBV"))
        ));
    }

    #[test]
    fn malformed_fiscal_label_fails_build() {
        let tables = RawTables {
            profile: profile(),
            dividends: vec![],
            bonuses: vec![row("ll1-ll2", "10%")],
        };
        assert!(matches!(
            build_record("NBL", &tables, now()),
            Err(BuildError::Benefit(BenefitError::MalformedLabel(_)))
        ));
    }

    #[test]
    fn saturday_fetch_is_backdated() {
        let saturday = NaiveDate::from_ymd_opt(2023, 4, 22)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let tables = RawTables {
            profile: profile(),
            dividends: vec![],
            bonuses: vec![],
        };
        let record = build_record("NBL", &tables, saturday).unwrap();
        assert_eq!(
            record.scrape_date,
            NaiveDate::from_ymd_opt(2023, 4, 21).unwrap()
        );
    }
}
