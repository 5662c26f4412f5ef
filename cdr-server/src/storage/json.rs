//! JSON snapshot storage backend.
//!
//! Holds a [`MemoryStorage`] and rewrites the whole snapshot after every
//! change. The snapshot is written to a sibling temp file first and then
//! renamed over the old one. A change that cannot be written is dropped, so
//! memory never runs ahead of disk.

use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use cdr_core::{ParseReport, ParsedRecord};

use super::{
    FileDetails, FileInsert, FileSummary, ListFilesOptions, MemoryStorage, RecordFilters,
    RecordSearchOptions, RecordSearchResult, Storage, StorageError,
};

pub struct JsonStorage {
    path: PathBuf,
    inner: MemoryStorage,
}

impl JsonStorage {
    /// Load the snapshot at `path`, or start empty if there is none
    pub fn open(path: PathBuf) -> Result<Self, StorageError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let inner = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let inner: MemoryStorage = serde_json::from_reader(reader)?;
            info!("Loaded storage snapshot {}", path.display());
            inner
        } else {
            debug!("No storage snapshot at {}, starting empty", path.display());
            MemoryStorage::new()
        };

        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &MemoryStorage) -> Result<(), StorageError> {
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, state)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            warn!("Failed to replace {}: {}", self.path.display(), e);
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Run `change` on a copy of the state and keep it only once it is on disk
    fn apply<T, F>(&mut self, change: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut MemoryStorage) -> Result<T, StorageError>,
    {
        let mut next = self.inner.clone();
        let value = change(&mut next)?;
        self.persist(&next)?;
        self.inner = next;
        Ok(value)
    }
}

impl Storage for JsonStorage {
    fn create_file(&mut self, file: FileInsert) -> Result<FileSummary, StorageError> {
        self.apply(|state| state.create_file(file))
    }

    fn append_records(
        &mut self,
        file_id: u64,
        records: &[ParsedRecord],
    ) -> Result<usize, StorageError> {
        if records.is_empty() {
            return self.inner.append_records(file_id, records);
        }
        self.apply(|state| state.append_records(file_id, records))
    }

    fn store_report(&mut self, report: &ParseReport) -> Result<FileSummary, StorageError> {
        self.apply(|state| state.store_report(report))
    }

    fn list_files(&self, options: &ListFilesOptions) -> Vec<FileSummary> {
        self.inner.list_files(options)
    }

    fn get_file(&self, file_id: u64) -> Option<FileDetails> {
        self.inner.get_file(file_id)
    }

    fn search_records(
        &self,
        filters: &RecordFilters,
        options: &RecordSearchOptions,
    ) -> RecordSearchResult {
        self.inner.search_records(filters, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::save_report;
    use cdr_core::parse_content;
    use tempfile::TempDir;

    fn create_test_storage() -> (JsonStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = JsonStorage::open(temp_dir.path().join("storage.json")).unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_reload_snapshot() {
        let (mut storage, temp) = create_test_storage();
        let report = parse_content(Some("x.dat"), "2,1\n6,000300010000000501010101");
        save_report(&mut storage, &report).unwrap();
        assert!(storage.path().exists());

        let reloaded = JsonStorage::open(temp.path().join("storage.json")).unwrap();
        let details = reloaded.get_file(1).unwrap();
        assert_eq!(details.summary.file.file_name, "x.dat");
        assert_eq!(details.record_count, 2);

        let result = reloaded.search_records(
            &RecordFilters {
                ip: Some("1.1.1.1".to_string()),
                ..Default::default()
            },
            &RecordSearchOptions::default(),
        );
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].parsed.record.cell_id, Some(5));
    }

    #[test]
    fn test_ids_continue_after_reload() {
        let (mut storage, temp) = create_test_storage();
        save_report(&mut storage, &parse_content(None, "2,1")).unwrap();

        let mut reloaded = JsonStorage::open(temp.path().join("storage.json")).unwrap();
        let summary = save_report(&mut reloaded, &parse_content(None, "3,1")).unwrap();
        assert_eq!(summary.id, 2);
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let (mut storage, temp) = create_test_storage();
        // A directory in the way of the temp file makes every write fail
        let blocker = temp.path().join("storage.json.tmp");
        fs::create_dir(&blocker).unwrap();

        let report = parse_content(Some("x.dat"), "2,1\n12,5");
        assert!(save_report(&mut storage, &report).is_err());
        assert!(storage.get_file(1).is_none());
        assert!(storage.list_files(&ListFilesOptions::default()).is_empty());
        assert!(!storage.path().exists());

        fs::remove_dir(&blocker).unwrap();
        let summary = save_report(&mut storage, &report).unwrap();
        assert_eq!(summary.id, 1);
        assert_eq!(storage.get_file(1).unwrap().record_count, 2);
    }

    #[test]
    fn test_report_is_written_once_with_its_records() {
        let (mut storage, temp) = create_test_storage();
        save_report(&mut storage, &parse_content(Some("x.dat"), "2,1\n12,5")).unwrap();

        let reloaded = JsonStorage::open(temp.path().join("storage.json")).unwrap();
        assert_eq!(reloaded.get_file(1).unwrap().record_count, 2);
        assert!(!temp.path().join("storage.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_snapshot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("storage.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonStorage::open(path),
            Err(StorageError::Json(_))
        ));
    }
}
