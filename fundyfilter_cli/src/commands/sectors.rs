//! The `sectors` subcommand: lists NEPSE sectors and their companies.

use anyhow::Result;
use clap::Args;

use crate::output::{print_json, print_sectors_csv, print_sectors_table, OutputFormat};

#[derive(Args)]
pub struct SectorsArgs {
    /// Print every symbol under each sector instead of counts
    #[arg(long)]
    pub symbols: bool,
}

pub async fn run(args: &SectorsArgs, format: &OutputFormat) -> Result<()> {
    let client = crate::build_client()?;
    let catalog = client.company_catalog().await?;

    if args.symbols {
        for sector in &catalog.sectors {
            println!("{}", sector);
            if let Some(symbols) = catalog.symbols_for(sector) {
                for symbol in symbols {
                    println!("  {}", symbol);
                }
            }
        }
        return Ok(());
    }

    let rows: Vec<(String, usize)> = catalog
        .sectors
        .iter()
        .map(|sector| {
            let count = catalog.symbols_for(sector).map_or(0, |s| s.len());
            (sector.clone(), count)
        })
        .collect();

    match format {
        OutputFormat::Table => print_sectors_table(&rows),
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => print_sectors_csv(&rows)?,
    }

    Ok(())
}
