//! NEPSE trading-calendar rules: staleness of cached rows and scrape-date
//! stamping.
//!
//! Both functions take the current timestamp as a parameter instead of
//! reading the wall clock, so they stay deterministic under test. Saturday
//! is the weekly full market-rest day; Sunday reopens trading but its
//! morning still reflects Friday's close.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// NEPSE closes at 15:00 local exchange time.
fn market_close() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 0, 0).expect("static time")
}

/// Decides whether a cached row scraped on `scrape_date` is outdated at
/// `now`.
///
/// Not a fixed TTL: a row is stale once a trading session it has not seen
/// has closed. On Sunday before close the last closed session is Friday's
/// (two days back, across the Saturday rest day); on Saturday it is
/// Friday's (one day back); on a normal trading day before close it is
/// yesterday's.
pub fn is_stale(scrape_date: NaiveDate, now: NaiveDateTime) -> bool {
    let today = now.date();
    match today.weekday() {
        Weekday::Sun => {
            if now.time() > market_close() {
                scrape_date < today
            } else {
                scrape_date < today - Duration::days(2)
            }
        }
        Weekday::Sat => scrape_date < today - Duration::days(1),
        _ => {
            if now.time() > market_close() {
                scrape_date < today
            } else {
                scrape_date < today - Duration::days(1)
            }
        }
    }
}

/// The date to stamp on a freshly scraped record.
///
/// A fetch on the Saturday rest day is back-dated by one day so the record
/// aligns with the last trading session. No time-of-day check here; that
/// belongs to the read-time staleness rule only.
pub fn scrape_stamp(now: NaiveDateTime) -> NaiveDate {
    let today = now.date();
    if today.weekday() == Weekday::Sat {
        today - Duration::days(1)
    } else {
        today
    }
}
