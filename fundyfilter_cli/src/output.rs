use anyhow::Result;
use fundyfilter_lib::CompanyRecord;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Tabled, Serialize)]
struct CompanyRow {
    #[tabled(rename = "Symbol")]
    #[serde(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Sector")]
    #[serde(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Book Value")]
    #[serde(rename = "Book Value")]
    book_value: String,
    #[tabled(rename = "PBV")]
    #[serde(rename = "PBV")]
    pbv: String,
    #[tabled(rename = "EPS")]
    #[serde(rename = "EPS")]
    eps: String,
    #[tabled(rename = "P/E")]
    #[serde(rename = "P/E")]
    pe_ratio: String,
    #[tabled(rename = "Yield")]
    #[serde(rename = "Yield")]
    year_yield: String,
    #[tabled(rename = "Dvnd %")]
    #[serde(rename = "Dvnd %")]
    dvnd_rate: String,
    #[tabled(rename = "Dvnd Prob")]
    #[serde(rename = "Dvnd Prob")]
    dvnd_prob: String,
    #[tabled(rename = "Bonus %")]
    #[serde(rename = "Bonus %")]
    bonus_rate: String,
    #[tabled(rename = "Bonus Prob")]
    #[serde(rename = "Bonus Prob")]
    bonus_prob: String,
    #[tabled(rename = "Scraped")]
    #[serde(rename = "Scraped")]
    scrape_date: String,
}

#[derive(Tabled, Serialize)]
struct SectorRow {
    #[tabled(rename = "Sector")]
    #[serde(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Companies")]
    #[serde(rename = "Companies")]
    companies: usize,
}

// -- Row builders --

fn build_company_rows(records: &[CompanyRecord]) -> Vec<CompanyRow> {
    records
        .iter()
        .map(|r| CompanyRow {
            symbol: r.symbol.clone(),
            sector: r.sector.clone(),
            price: r.market_price.clone(),
            book_value: r.book_value.clone(),
            pbv: r.pbv.clone(),
            eps: r.eps.clone(),
            pe_ratio: r.pe_ratio.clone(),
            year_yield: r.year_yield.clone(),
            dvnd_rate: format!("{:.2}", r.avg_dvnd_rate),
            dvnd_prob: format!("{:.2}", r.avg_dvnd_prob),
            bonus_rate: format!("{:.2}", r.avg_bonus_rate),
            bonus_prob: format!("{:.2}", r.avg_bonus_prob),
            scrape_date: r.scrape_date.to_string(),
        })
        .collect()
}

fn build_sector_rows(sectors: &[(String, usize)]) -> Vec<SectorRow> {
    sectors
        .iter()
        .map(|(sector, companies)| SectorRow {
            sector: sector.clone(),
            companies: *companies,
        })
        .collect()
}

// -- Table output --

pub fn print_companies_table(records: &[CompanyRecord]) {
    println!("{}", Table::new(build_company_rows(records)));
}

pub fn print_sectors_table(sectors: &[(String, usize)]) {
    println!("{}", Table::new(build_sector_rows(sectors)));
}

// -- CSV output --

pub fn print_companies_csv(records: &[CompanyRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_company_rows(records) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_sectors_csv(sectors: &[(String, usize)]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_sector_rows(sectors) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
