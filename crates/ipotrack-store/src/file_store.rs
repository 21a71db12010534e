use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::records::{Dataset, FailedFile, PendingFile};

const DATASET_FILE: &str = "ipos.json";
const PENDING_FILE: &str = "pending_ipos.json";
const FAILED_FILE: &str = "failed_ipos.json";
const BACKUP_FILE: &str = "ipos_backup.json";

/// Single-writer file store rooted at a data directory.
///
/// Concurrent pipeline runs are not supported; callers must serialize batch
/// jobs externally.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir.join(DATASET_FILE)
    }

    pub fn pending_path(&self) -> PathBuf {
        self.data_dir.join(PENDING_FILE)
    }

    pub fn failed_path(&self) -> PathBuf {
        self.data_dir.join(FAILED_FILE)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.data_dir.join(BACKUP_FILE)
    }

    /// Load the canonical dataset. A missing file yields an empty default
    /// dataset rather than an error.
    pub fn load_dataset(&self) -> Result<Dataset, StoreError> {
        self.read_optional(self.dataset_path())
            .map(Option::unwrap_or_default)
    }

    pub fn save_dataset(&self, dataset: &Dataset) -> Result<(), StoreError> {
        self.write_json(self.dataset_path(), dataset, "dataset")
    }

    /// Snapshot the current dataset file before a destructive merge so a bad
    /// batch can be rolled back by hand.
    pub fn backup_dataset(&self, dataset: &Dataset) -> Result<PathBuf, StoreError> {
        let path = self.backup_path();
        self.write_json(path.clone(), dataset, "dataset backup")?;
        Ok(path)
    }

    /// Load the pending-review file, if a discovery pass has produced one.
    pub fn load_pending(&self) -> Result<Option<PendingFile>, StoreError> {
        self.read_optional(self.pending_path())
    }

    pub fn save_pending(&self, pending: &PendingFile) -> Result<(), StoreError> {
        self.write_json(self.pending_path(), pending, "pending entries")
    }

    pub fn save_failed(&self, failed: &FailedFile) -> Result<(), StoreError> {
        self.write_json(self.failed_path(), failed, "failed entries")
    }

    fn read_optional<T: DeserializeOwned>(&self, path: PathBuf) -> Result<Option<T>, StoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let body = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        let value = serde_json::from_str(&body)
            .map_err(|source| StoreError::Malformed { path, source })?;
        Ok(Some(value))
    }

    fn write_json<T: Serialize>(
        &self,
        path: PathBuf,
        value: &T,
        what: &'static str,
    ) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StoreError::Write {
            path: self.data_dir.clone(),
            source,
        })?;
        let body = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Serialize { what, source })?;
        fs::write(&path, body).map_err(|source| StoreError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{DateRange, FailedEntry, IpoRecord, PendingRecord};

    fn record(ticker: &str, date: &str, price: f64) -> IpoRecord {
        IpoRecord {
            ticker: ticker.to_string(),
            name: format!("{ticker} Inc"),
            ipo_date: date.to_string(),
            ipo_price: price,
            exchange: String::from("NYSE"),
            sector: String::from("Technology"),
        }
    }

    #[test]
    fn missing_dataset_loads_as_empty_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        let dataset = store.load_dataset().expect("load");
        assert!(dataset.ipos.is_empty());
        assert_eq!(dataset.source, "Multiple sources");
    }

    #[test]
    fn dataset_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        let dataset = Dataset {
            last_updated: String::from("2024-03-21"),
            source: String::from("Finnhub"),
            ipos: vec![record("RDDT", "2024-03-21", 34.0)],
        };
        store.save_dataset(&dataset).expect("save");

        let loaded = store.load_dataset().expect("load");
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn backup_writes_separate_snapshot_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        let dataset = Dataset {
            last_updated: String::from("2024-03-21"),
            source: String::from("Finnhub"),
            ipos: vec![record("RDDT", "2024-03-21", 34.0)],
        };
        store.save_dataset(&dataset).expect("save");
        let backup_path = store.backup_dataset(&dataset).expect("backup");

        assert!(backup_path.exists());
        assert_ne!(backup_path, store.dataset_path());
    }

    #[test]
    fn pending_and_failed_files_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        assert!(store.load_pending().expect("load").is_none());

        let pending = PendingFile {
            generated_at: String::from("2024-03-21 10:00:00"),
            source: String::from("Finnhub IPO Calendar API"),
            date_range: DateRange {
                from: String::from("2023-01-01"),
                to: String::from("2024-03-21"),
            },
            existing_count: 1,
            pending_count: 1,
            pending_entries: vec![PendingRecord {
                ticker: String::from("ALAB"),
                name: String::from("Astera Labs"),
                ipo_date: String::from("2024-03-20"),
                ipo_price: 36.0,
                exchange: String::from("NASDAQ"),
                sector: String::from("Unknown"),
                status: String::from("priced"),
                source: String::from("Finnhub"),
            }],
        };
        store.save_pending(&pending).expect("save pending");
        assert_eq!(store.load_pending().expect("load"), Some(pending));

        let failed = FailedFile {
            generated_at: String::from("2024-03-21 10:05:00"),
            failed_count: 1,
            failed_entries: vec![FailedEntry {
                ticker: String::from("GONE"),
                name: String::from("Gone Corp"),
                ipo_date: String::from("2023-05-01"),
                error: String::from("no price data available"),
            }],
        };
        store.save_failed(&failed).expect("save failed");
        assert!(store.failed_path().exists());
    }

    #[test]
    fn legacy_record_without_sector_still_loads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path());

        let body = r#"{
            "last_updated": "2023-06-01",
            "source": "manual",
            "ipos": [{"ticker": "ARM", "name": "Arm Holdings", "ipo_date": "2023-09-14", "ipo_price": 51.0}]
        }"#;
        std::fs::write(store.dataset_path(), body).expect("write");

        let dataset = store.load_dataset().expect("load");
        assert_eq!(dataset.ipos[0].sector, "Unknown");
        assert_eq!(dataset.ipos[0].exchange, "Unknown");
    }
}
