//! Error types for the provider client.

use reqwest::StatusCode;

/// Errors that can occur while fetching or parsing Merolagani pages.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP request itself failed (connectivity, DNS, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("unexpected status {status}")]
    HttpStatus { status: StatusCode },
    /// The company list page carried no sector panels.
    #[error("no sector panels found on company list page")]
    MissingSectors,
    /// The detail page for a symbol contained no tables at all.
    #[error("no table found for symbol {symbol}, check webpage")]
    NoTables { symbol: String },
    /// The detail page carried fewer tables than a valid company page has.
    /// Signals a broken page or a nonexistent symbol.
    #[error("not all tables found for symbol {symbol} ({found} present), check webpage")]
    MissingTables { symbol: String, found: usize },
    /// The page structure did not match what the parser expects.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True for failures scoped to a single symbol's page. Callers refreshing
    /// a batch skip these and keep going; anything else aborts the batch.
    pub fn is_symbol_scoped(&self) -> bool {
        matches!(self, Self::NoTables { .. } | Self::MissingTables { .. })
    }
}
