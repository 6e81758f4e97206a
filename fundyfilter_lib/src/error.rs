//! Error type for the library layer.
//!
//! Only failures that abort an operation live here. Per-symbol problems
//! (broken pages, malformed fiscal labels) are recovered inside the refresh
//! loop and never surface as errors.

use crate::store::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum FundyError {
    /// The provider could not be reached or answered with a hard failure.
    #[error("provider error: {0}")]
    Provider(#[from] merolagani_api::Error),
    /// Reading or writing the cache file failed at the I/O level.
    #[error("cache store error: {0}")]
    Store(#[from] StoreError),
}
