//! Record storage.
//!
//! Uploaded files are stored as a [`FileSummary`] plus the records that
//! decoded successfully. Two backends implement [`Storage`]:
//!
//! - [`MemoryStorage`] - lives for the lifetime of the process
//! - [`JsonStorage`] - the same state, written to a JSON snapshot after
//!   every change and reloaded on start
//!
//! Lines that failed to decode are only reported back to the uploader; they
//! are not stored.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use thiserror::Error;

use cdr_core::{ParseReport, ParsedRecord};

use crate::config::{ConfigError, StorageConfig};

pub mod json;
pub mod memory;

pub use json::JsonStorage;
pub use memory::MemoryStorage;

pub const DEFAULT_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File {0} not found")]
    FileNotFound(u64),
    #[error("I/O operation failed")]
    Io(#[from] std::io::Error),
    #[error("Cannot read or write snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// Counts for a file about to be stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInsert {
    pub file_name: String,
    pub total_lines: usize,
    pub parsed_lines: usize,
    pub skipped_lines: usize,
    pub error_count: usize,
}

impl From<&ParseReport> for FileInsert {
    fn from(report: &ParseReport) -> Self {
        FileInsert {
            file_name: report.file_name.clone(),
            total_lines: report.total_lines,
            parsed_lines: report.parsed_lines,
            skipped_lines: report.skipped_lines,
            error_count: report.errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: u64,
    #[serde(flatten)]
    pub file: FileInsert,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetails {
    #[serde(flatten)]
    pub summary: FileSummary,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub file_id: u64,
    #[serde(flatten)]
    pub parsed: ParsedRecord,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileOrder {
    #[default]
    UploadedAt,
    FileName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordOrder {
    LineNumber,
    #[default]
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListFilesOptions {
    pub limit: usize,
    pub offset: usize,
    pub order_by: FileOrder,
    pub direction: Direction,
}

impl Default for ListFilesOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            order_by: FileOrder::default(),
            direction: Direction::default(),
        }
    }
}

/// Record filters; every filter that is set must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordFilters {
    pub file_id: Option<u64>,
    pub cdr_id: Option<u64>,
    pub mnc: Option<u64>,
    pub dmcc: Option<String>,
    pub cell_id: Option<u64>,
    /// Case-insensitive substring of the ip
    pub ip: Option<String>,
    /// Case-insensitive substring of the raw line
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordSearchOptions {
    pub limit: usize,
    pub offset: usize,
    pub order_by: RecordOrder,
    pub direction: Direction,
    pub include_total: bool,
}

impl Default for RecordSearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            order_by: RecordOrder::default(),
            direction: Direction::default(),
            include_total: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSearchResult {
    pub records: Vec<StoredRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

pub trait Storage: Send + Sync {
    fn create_file(&mut self, file: FileInsert) -> Result<FileSummary, StorageError>;

    /// Attach decoded records to an existing file, returning how many were added
    fn append_records(
        &mut self,
        file_id: u64,
        records: &[ParsedRecord],
    ) -> Result<usize, StorageError>;

    /// Store a file summary together with its decoded records
    ///
    /// Either both are stored or neither is.
    fn store_report(&mut self, report: &ParseReport) -> Result<FileSummary, StorageError> {
        let summary = self.create_file(FileInsert::from(report))?;
        self.append_records(summary.id, &report.records)?;
        Ok(summary)
    }

    fn list_files(&self, options: &ListFilesOptions) -> Vec<FileSummary>;

    fn get_file(&self, file_id: u64) -> Option<FileDetails>;

    fn search_records(
        &self,
        filters: &RecordFilters,
        options: &RecordSearchOptions,
    ) -> RecordSearchResult;
}

/// Shared storage for use across handlers
pub type SharedStorage = Arc<RwLock<Box<dyn Storage>>>;

/// Open the backend selected by `config`
pub fn create_shared_storage(config: &StorageConfig) -> Result<SharedStorage, StorageError> {
    let storage: Box<dyn Storage> = match config {
        StorageConfig::Memory => {
            info!("Using in-memory storage");
            Box::new(MemoryStorage::new())
        }
        StorageConfig::Json { path } => {
            info!("Using JSON storage at {}", path.display());
            Box::new(JsonStorage::open(path.clone())?)
        }
    };
    Ok(Arc::new(RwLock::new(storage)))
}

/// Store a parsed file and its decoded records
pub fn save_report(
    storage: &mut dyn Storage,
    report: &ParseReport,
) -> Result<FileSummary, StorageError> {
    let summary = storage.store_report(report)?;
    info!(
        "Stored file {} '{}': {} records, {} errors",
        summary.id,
        summary.file.file_name,
        report.records.len(),
        report.errors
    );
    Ok(summary)
}

/// Apply offset and limit
pub(crate) fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}
