//! Core engine for Fundy Filter: incremental refresh of scraped NEPSE
//! fundamentals with a market-calendar-aware staleness policy.
//!
//! The flow is: requested symbols -> [`reconcile`] against the cached
//! dataset -> outdated subset -> [`Refresher`] fetches and rebuilds each
//! one -> merged cache persisted and returned. Presentation layers consume
//! the returned rows through the [`filter`] module.

pub mod benefit;
pub mod builder;
pub mod calendar;
pub mod error;
pub mod filter;
pub mod model;
pub mod reconcile;
pub mod refresh;
pub mod store;

pub use merolagani_api;

pub use builder::{build_record, BuildError};
pub use error::FundyError;
pub use filter::{CmpOp, Criteria, Criterion, NumericColumn, SortKey};
pub use model::{Cache, CompanyRecord, REQUIRED_COLUMNS};
pub use reconcile::{reconcile, Reconciliation};
pub use refresh::{Progress, RefreshOutcome, Refresher, DEFAULT_FETCH_DELAY};
pub use store::{CacheStore, StoreError};
