//! The `download` subcommand: refreshes the local fundamentals cache.
//!
//! Only symbols whose cached rows are stale under the market calendar are
//! fetched; fresh rows and stale rows outside the requested set are carried
//! over untouched.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::Local;
use clap::Args;
use fundyfilter_lib::{CacheStore, Refresher};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Args)]
pub struct DownloadArgs {
    /// Symbols to refresh; defaults to every listed company
    pub symbols: Vec<String>,

    /// Restrict the refresh to one sector (by its listed name)
    #[arg(long, conflicts_with = "symbols")]
    pub sector: Option<String>,

    /// Cache file to reconcile against and overwrite
    #[arg(long, default_value = "data.csv")]
    pub cache: PathBuf,

    /// Delay between detail-page fetches in milliseconds
    #[arg(long, default_value = "300")]
    pub delay_ms: u64,
}

pub async fn run(args: &DownloadArgs) -> Result<()> {
    let client = crate::build_client()?;

    let requested = if !args.symbols.is_empty() {
        args.symbols.iter().map(|s| s.to_uppercase()).collect()
    } else {
        let catalog = client.company_catalog().await?;
        match &args.sector {
            Some(sector) => match catalog.symbols_for(sector) {
                Some(symbols) => symbols.to_vec(),
                None => bail!(
                    "unknown sector {:?}; run `fundyfilter sectors` for the list",
                    sector
                ),
            },
            None => catalog.all_symbols(),
        }
    };

    if requested.is_empty() {
        bail!("nothing to refresh");
    }

    let store = CacheStore::new(&args.cache);
    let refresher = Refresher::new(&client, &store)
        .with_delay(Duration::from_millis(args.delay_ms));

    let pb = ProgressBar::new(requested.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5} {msg}",
        )
        .unwrap(),
    );
    pb.set_message("checking cache...");

    let now = Local::now().naive_local();
    let outcome = refresher
        .process(&requested, now, |p| {
            pb.set_length(p.total as u64);
            pb.set_position(p.done as u64);
            pb.set_message(p.symbol.to_string());
        })
        .await?;
    pb.finish_and_clear();

    if outcome.fetched.is_empty() && outcome.skipped.is_empty() {
        eprintln!(
            "Cache is up to date ({} rows in {})",
            outcome.cache.len(),
            args.cache.display()
        );
        return Ok(());
    }

    eprintln!(
        "Refreshed {} of {} symbols ({} rows in {})",
        outcome.fetched.len(),
        requested.len(),
        outcome.cache.len(),
        args.cache.display()
    );
    if !outcome.skipped.is_empty() {
        eprintln!("Skipped (broken or delisted): {}", outcome.skipped.join(", "));
    }

    Ok(())
}
