//! Decides which requested symbols need a re-fetch and which cached rows
//! survive the refresh untouched.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::calendar::is_stale;
use crate::model::Cache;

/// Result of reconciling a cache against a requested symbol list.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Symbols that must be fetched: requested symbols missing from the
    /// cache (in request order), then requested symbols whose cached row
    /// has gone stale.
    pub outdated: Vec<String>,
    /// Cached rows to carry into the refreshed cache unchanged. `None` when
    /// there was no usable cache at all.
    pub retained: Option<Cache>,
}

impl Reconciliation {
    /// True when every requested symbol is already covered by a fresh row.
    pub fn is_up_to_date(&self) -> bool {
        self.outdated.is_empty()
    }
}

/// Partitions `requested` into symbols needing a fetch and rows to retain.
///
/// Staleness is evaluated against every cached row, but only requested
/// ("covered") symbols are ever moved into `outdated`: a cached row that is
/// stale yet not part of this request is mirrored through `retained` as-is.
/// Refresh scope is limited to what the caller asked for.
///
/// Invariants: `outdated` and `retained` symbols are disjoint, and every
/// requested symbol either appears in `outdated` or has a fresh retained
/// row.
pub fn reconcile(
    cache: Option<Cache>,
    requested: &[String],
    now: NaiveDateTime,
) -> Reconciliation {
    let Some(cache) = cache else {
        return Reconciliation {
            outdated: requested.to_vec(),
            retained: None,
        };
    };

    let stale: BTreeSet<String> = cache
        .records()
        .filter(|record| is_stale(record.scrape_date, now))
        .map(|record| record.symbol.clone())
        .collect();

    let covered: BTreeSet<&str> = requested
        .iter()
        .map(|s| s.as_str())
        .filter(|s| cache.contains(s))
        .collect();

    // Requested symbols the cache has never seen, in request order.
    let mut outdated: Vec<String> = requested
        .iter()
        .filter(|s| !cache.contains(s))
        .cloned()
        .collect();

    let mut retained = Cache::new();
    for record in cache.into_records() {
        let refresh = stale.contains(&record.symbol) && covered.contains(record.symbol.as_str());
        if refresh {
            outdated.push(record.symbol);
        } else {
            retained.insert(record);
        }
    }

    Reconciliation {
        outdated,
        retained: Some(retained),
    }
}
