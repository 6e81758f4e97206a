//! Drives the fetch-build-merge-persist cycle for outdated symbols.

use std::time::Duration;

use chrono::NaiveDateTime;
use merolagani_api::Client;

use crate::builder::build_record;
use crate::error::FundyError;
use crate::model::Cache;
use crate::reconcile::reconcile;
use crate::store::CacheStore;

/// Pause between detail-page fetches, respecting the site's informal rate
/// limits.
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(300);

/// Progress of a running refresh, reported once per processed symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress<'a> {
    /// Symbols processed so far, including the current one.
    pub done: usize,
    /// Total symbols in this batch.
    pub total: usize,
    /// The symbol just processed.
    pub symbol: &'a str,
}

/// What a refresh cycle did.
#[derive(Debug)]
pub struct RefreshOutcome {
    /// The merged cache, as persisted.
    pub cache: Cache,
    /// Symbols fetched and rebuilt this cycle.
    pub fetched: Vec<String>,
    /// Symbols skipped because their page was broken or their data
    /// malformed. Their old rows, if any, were already moved out by
    /// reconciliation and are gone from the cache.
    pub skipped: Vec<String>,
}

/// Sequential refresh driver: one fetch at a time, best-effort per symbol,
/// sole writer of the cache file.
pub struct Refresher<'a> {
    client: &'a Client,
    store: &'a CacheStore,
    delay: Duration,
}

impl<'a> Refresher<'a> {
    pub fn new(client: &'a Client, store: &'a CacheStore) -> Self {
        Self {
            client,
            store,
            delay: DEFAULT_FETCH_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// One-call entry point: load the cache, reconcile against `requested`,
    /// and refresh whatever came out as outdated. When everything is
    /// covered by fresh rows, returns the retained cache without a fetch or
    /// a write.
    pub async fn process<F>(
        &self,
        requested: &[String],
        now: NaiveDateTime,
        progress: F,
    ) -> Result<RefreshOutcome, FundyError>
    where
        F: FnMut(&Progress<'_>),
    {
        let cached = self.store.load()?;
        let outcome = reconcile(cached, requested, now);
        if outcome.is_up_to_date() {
            tracing::info!("all {} requested symbols are up to date", requested.len());
            return Ok(RefreshOutcome {
                cache: outcome.retained.unwrap_or_default(),
                fetched: Vec::new(),
                skipped: Vec::new(),
            });
        }
        self.refresh(&outcome.outdated, outcome.retained, now, progress)
            .await
    }

    /// Fetches every outdated symbol in order, merges the survivors with the
    /// retained rows, and persists the result in one overwrite.
    ///
    /// Symbol-scoped failures (broken page, malformed data) are logged and
    /// skipped; the batch never aborts for them. Connectivity failures
    /// abort and surface to the caller.
    pub async fn refresh<F>(
        &self,
        outdated: &[String],
        retained: Option<Cache>,
        now: NaiveDateTime,
        mut progress: F,
    ) -> Result<RefreshOutcome, FundyError>
    where
        F: FnMut(&Progress<'_>),
    {
        let mut cache = retained.unwrap_or_default();
        let mut fetched = Vec::new();
        let mut skipped = Vec::new();
        let total = outdated.len();

        for (i, symbol) in outdated.iter().enumerate() {
            match self.client.company_detail(symbol).await {
                Ok(tables) => match build_record(symbol, &tables, now) {
                    Ok(record) => {
                        cache.insert(record);
                        fetched.push(symbol.clone());
                    }
                    Err(err) => {
                        tracing::warn!("skipping {}: {}", symbol, err);
                        skipped.push(symbol.clone());
                    }
                },
                Err(err) if err.is_symbol_scoped() => {
                    tracing::warn!("skipping {}: {}", symbol, err);
                    skipped.push(symbol.clone());
                }
                Err(err) => return Err(err.into()),
            }

            progress(&Progress {
                done: i + 1,
                total,
                symbol,
            });

            if !self.delay.is_zero() && i + 1 < total {
                tokio::time::sleep(self.delay).await;
            }
        }

        self.store.save(&cache)?;
        Ok(RefreshOutcome {
            cache,
            fetched,
            skipped,
        })
    }
}
