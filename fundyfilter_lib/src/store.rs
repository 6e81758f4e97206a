//! CSV persistence for the cache file.
//!
//! One flat table, one header row, full overwrite on every save. The store
//! never appends and keeps no history; a half-written file from a crashed
//! run simply fails validation on the next load and triggers a full
//! re-fetch.

use std::path::{Path, PathBuf};

use crate::model::{Cache, CompanyRecord, REQUIRED_COLUMNS};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Handle on the cache file location.
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cache, or `None` when no usable cache exists.
    ///
    /// Absence, a header missing any required column, and unreadable rows
    /// all collapse to `None`: the cache as a whole is either valid or it
    /// does not exist. Invalid files are logged, never fatal.
    pub fn load(&self) -> Result<Option<Cache>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|col| !headers.iter().any(|h| h == **col))
            .copied()
            .collect();
        if !missing.is_empty() {
            tracing::warn!(
                "cache file {} is missing columns {:?}; treating as absent",
                self.path.display(),
                missing
            );
            return Ok(None);
        }

        let mut cache = Cache::new();
        for row in reader.deserialize::<CompanyRecord>() {
            match row {
                Ok(record) => cache.insert(record),
                Err(err) => {
                    tracing::warn!(
                        "cache file {} has an unreadable row ({}); treating as absent",
                        self.path.display(),
                        err
                    );
                    return Ok(None);
                }
            }
        }
        Ok(Some(cache))
    }

    /// Writes the whole cache, replacing whatever was there.
    pub fn save(&self, cache: &Cache) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_path(&self.path)?;
        for record in cache.records() {
            writer.serialize(record)?;
        }
        writer.flush()?;
        tracing::info!(
            "wrote {} records to {}",
            cache.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::record;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store(tag: &str) -> CacheStore {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "fundyfilter-store-{}-{}-{}.csv",
            tag,
            std::process::id(),
            n
        ));
        CacheStore::new(path)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn absent_file_loads_as_none() {
        let store = temp_store("absent");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = temp_store("roundtrip");
        let cache = Cache::from_records(vec![
            record("NBL", date(2023, 4, 19)),
            record("ADBL", date(2023, 4, 18)),
        ]);
        store.save(&cache).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, cache);

        std::fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let store = temp_store("overwrite");
        store
            .save(&Cache::from_records(vec![
                record("NBL", date(2023, 4, 18)),
                record("ADBL", date(2023, 4, 18)),
            ]))
            .unwrap();
        store
            .save(&Cache::from_records(vec![record("API", date(2023, 4, 19))]))
            .unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains("API"));

        std::fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn missing_required_column_invalidates_cache() {
        let store = temp_store("badschema");
        std::fs::write(
            store.path(),
            "Symbol,Sector,Market Price\nNBL,Commercial Banks,242.10\n",
        )
        .unwrap();
        assert!(store.load().unwrap().is_none());
        std::fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn corrupt_row_invalidates_cache() {
        let store = temp_store("corrupt");
        let header = REQUIRED_COLUMNS.join(",");
        // scrape_date column carries a non-date.
        let row = "NBL,Others,817,512.92,1.59,47.28,17.28,36.33,100,100,not-a-date";
        std::fs::write(store.path(), format!("{}\n{}\n", header, row)).unwrap();
        assert!(store.load().unwrap().is_none());
        std::fs::remove_file(store.path()).unwrap();
    }

    #[test]
    fn extra_columns_are_tolerated() {
        let store = temp_store("extra");
        let header = format!("{},{}", REQUIRED_COLUMNS.join(","), "Shares Outstanding");
        let row = "NBL,Others,817,512.92,1.59,47.28,17.28,36.33,100,100,2023-04-19,180000000";
        std::fs::write(store.path(), format!("{}\n{}\n", header, row)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.get("NBL").unwrap().scrape_date, date(2023, 4, 19));
        // Optional columns default when absent.
        assert_eq!(loaded.get("NBL").unwrap().avg_bonus_rate, 0.0);
        assert_eq!(loaded.get("NBL").unwrap().year_yield, "");

        std::fs::remove_file(store.path()).unwrap();
    }
}
