//! HTTP client for the Merolagani company pages (no official API).
//!
//! Scrapes the CompanyList and CompanyDetail pages of merolagani.com and
//! returns the raw tables they contain. Higher layers turn those tables
//! into normalized records.

mod client;
mod errors;
pub mod html;
mod types;
mod user_agent;

pub use self::client::Client;
pub use self::errors::Error;
pub use self::types::{BenefitRow, CompanyCatalog, RawTables, MIN_DETAIL_TABLES};
