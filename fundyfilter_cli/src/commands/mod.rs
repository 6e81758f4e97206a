//! CLI subcommand implementations.

pub mod download;
pub mod filter;
pub mod sectors;
