mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fundyfilter_lib::merolagani_api::Client;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "fundyfilter")]
#[command(about = "Filter NEPSE companies by scraped fundamentals")]
struct Cli {
    /// Output format: table, json, or csv
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sectors and their listed companies
    Sectors(commands::sectors::SectorsArgs),
    /// Refresh the local fundamentals cache
    Download(commands::download::DownloadArgs),
    /// Filter cached companies by fundamentals
    Filter(Box<commands::filter::FilterArgs>),
}

fn build_client() -> Result<Client> {
    let client = match std::env::var("MEROLAGANI_BASE_URL") {
        Ok(base) => Client::with_base_url(&base)?,
        Err(_) => Client::new()?,
    };
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fundyfilter=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Sectors(args) => commands::sectors::run(args, &format).await?,
        Commands::Download(args) => commands::download::run(args).await?,
        Commands::Filter(args) => commands::filter::run(args.as_ref(), &format)?,
    }

    Ok(())
}
