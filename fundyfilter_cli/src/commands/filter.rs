//! The `filter` subcommand: queries the cached fundamentals offline.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use fundyfilter_lib::{
    filter::sort_records, CacheStore, CmpOp, Criteria, Criterion, NumericColumn, SortKey,
};

use crate::output::{print_companies_csv, print_companies_table, print_json, OutputFormat};

#[derive(Args)]
pub struct FilterArgs {
    /// Cache file written by `fundyfilter download`
    #[arg(long, default_value = "data.csv")]
    pub cache: PathBuf,

    /// Filter by exact sector name
    #[arg(long)]
    pub sector: Option<String>,

    /// Keep rows with market price below this value
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Keep rows with book value below this value
    #[arg(long)]
    pub max_book_value: Option<f64>,

    /// Keep rows with PBV below this value
    #[arg(long)]
    pub max_pbv: Option<f64>,

    /// Keep rows with EPS above this value
    #[arg(long)]
    pub min_eps: Option<f64>,

    /// Keep rows with P/E ratio below this value
    #[arg(long)]
    pub max_pe: Option<f64>,

    /// Keep rows with average dividend rate above this value
    #[arg(long)]
    pub min_dvnd_rate: Option<f64>,

    /// Keep rows with dividend probability above this value
    #[arg(long)]
    pub min_dvnd_prob: Option<f64>,

    /// Keep rows with average bonus rate above this value
    #[arg(long)]
    pub min_bonus_rate: Option<f64>,

    /// Keep rows with bonus probability above this value
    #[arg(long)]
    pub min_bonus_prob: Option<f64>,

    /// Free-form one-year-yield condition, e.g. '>5', '<-10', '=0'
    #[arg(long)]
    pub year_yield: Option<String>,

    /// Sort column: symbol, sector, price, book-value, pbv, eps, pe,
    /// dvnd-rate, dvnd-prob, bonus-rate, bonus-prob, yield
    #[arg(long, default_value = "symbol")]
    pub sort_by: String,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,
}

fn build_criteria(args: &FilterArgs) -> Result<Criteria> {
    let mut numeric = Vec::new();

    let bounds = [
        (args.max_price, NumericColumn::MarketPrice, CmpOp::Lt),
        (args.max_book_value, NumericColumn::BookValue, CmpOp::Lt),
        (args.max_pbv, NumericColumn::Pbv, CmpOp::Lt),
        (args.min_eps, NumericColumn::Eps, CmpOp::Gt),
        (args.max_pe, NumericColumn::PeRatio, CmpOp::Lt),
        (args.min_dvnd_rate, NumericColumn::AvgDvndRate, CmpOp::Gt),
        (args.min_dvnd_prob, NumericColumn::AvgDvndProb, CmpOp::Gt),
        (args.min_bonus_rate, NumericColumn::AvgBonusRate, CmpOp::Gt),
        (args.min_bonus_prob, NumericColumn::AvgBonusProb, CmpOp::Gt),
    ];
    for (value, column, op) in bounds {
        if let Some(value) = value {
            numeric.push(Criterion { column, op, value });
        }
    }

    if let Some(expr) = &args.year_yield {
        match Criterion::parse(NumericColumn::YearYield, expr) {
            Some(criterion) => numeric.push(criterion),
            None => bail!("invalid --year-yield expression {:?}; expected e.g. '>5'", expr),
        }
    }

    Ok(Criteria {
        sector: args.sector.clone(),
        numeric,
    })
}

pub fn run(args: &FilterArgs, format: &OutputFormat) -> Result<()> {
    let store = CacheStore::new(&args.cache);
    let cache = match store.load()? {
        Some(cache) => cache,
        None => bail!(
            "no usable cache at {}; run `fundyfilter download` first",
            args.cache.display()
        ),
    };

    let criteria = build_criteria(args)?;
    let mut records = criteria.apply(&cache);

    let key = match SortKey::parse(&args.sort_by) {
        Some(key) => key,
        None => bail!("unknown sort column {:?}", args.sort_by),
    };
    sort_records(&mut records, key, args.desc);

    eprintln!("{} of {} companies match", records.len(), cache.len());

    match format {
        OutputFormat::Table => print_companies_table(&records),
        OutputFormat::Json => print_json(&records),
        OutputFormat::Csv => print_companies_csv(&records)?,
    }

    Ok(())
}
