//! In-memory storage backend.

use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use cdr_core::ParsedRecord;

use super::{
    paginate, Direction, FileDetails, FileInsert, FileOrder, FileSummary, ListFilesOptions,
    RecordFilters, RecordOrder, RecordSearchOptions, RecordSearchResult, Storage, StorageError,
    StoredRecord,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStorage {
    next_file_id: u64,
    files: BTreeMap<u64, FileDetails>,
    records: BTreeMap<u64, Vec<StoredRecord>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            next_file_id: 1,
            files: BTreeMap::new(),
            records: BTreeMap::new(),
        }
    }
}

fn matches_filters(record: &StoredRecord, filters: &RecordFilters) -> bool {
    let cdr = &record.parsed.record;

    if filters.file_id.is_some_and(|id| id != record.file_id) {
        return false;
    }
    if filters.cdr_id.is_some_and(|id| id != cdr.id) {
        return false;
    }
    if filters.mnc.is_some() && filters.mnc != cdr.mnc {
        return false;
    }
    if filters.dmcc.is_some() && filters.dmcc != cdr.dmcc {
        return false;
    }
    if filters.cell_id.is_some() && filters.cell_id != cdr.cell_id {
        return false;
    }
    if let Some(ip) = &filters.ip {
        let haystack = cdr.ip.as_deref().unwrap_or_default().to_lowercase();
        if !haystack.contains(&ip.to_lowercase()) {
            return false;
        }
    }
    if let Some(text) = filters.text.as_deref().filter(|t| !t.is_empty()) {
        if !record
            .parsed
            .raw_line
            .to_lowercase()
            .contains(&text.to_lowercase())
        {
            return false;
        }
    }
    true
}

fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

/// Orders by the requested key; ties keep upload order (file id, then line)
fn compare_records(
    a: &StoredRecord,
    b: &StoredRecord,
    order_by: RecordOrder,
    direction: Direction,
) -> Ordering {
    let primary = match order_by {
        RecordOrder::LineNumber => a.parsed.line_number.cmp(&b.parsed.line_number),
        RecordOrder::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    directed(primary, direction)
        .then(a.file_id.cmp(&b.file_id))
        .then(a.parsed.line_number.cmp(&b.parsed.line_number))
}

impl Storage for MemoryStorage {
    fn create_file(&mut self, file: FileInsert) -> Result<FileSummary, StorageError> {
        let summary = FileSummary {
            id: self.next_file_id,
            file,
            uploaded_at: Utc::now(),
        };
        self.next_file_id += 1;

        debug!("Created file {} '{}'", summary.id, summary.file.file_name);
        self.files.insert(
            summary.id,
            FileDetails {
                summary: summary.clone(),
                record_count: 0,
            },
        );
        Ok(summary)
    }

    fn append_records(
        &mut self,
        file_id: u64,
        records: &[ParsedRecord],
    ) -> Result<usize, StorageError> {
        let file = self
            .files
            .get_mut(&file_id)
            .ok_or(StorageError::FileNotFound(file_id))?;
        if records.is_empty() {
            return Ok(0);
        }

        let created_at = Utc::now();
        let bucket = self.records.entry(file_id).or_default();
        bucket.extend(records.iter().map(|parsed| StoredRecord {
            file_id,
            parsed: parsed.clone(),
            created_at,
        }));
        file.record_count += records.len();

        Ok(records.len())
    }

    fn list_files(&self, options: &ListFilesOptions) -> Vec<FileSummary> {
        let mut all: Vec<FileSummary> = self.files.values().map(|f| f.summary.clone()).collect();

        all.sort_by(|a, b| {
            let ordering = match options.order_by {
                FileOrder::FileName => a.file.file_name.cmp(&b.file.file_name),
                FileOrder::UploadedAt => a.uploaded_at.cmp(&b.uploaded_at),
            };
            directed(ordering.then(a.id.cmp(&b.id)), options.direction)
        });

        paginate(all, options.limit, options.offset)
    }

    fn get_file(&self, file_id: u64) -> Option<FileDetails> {
        self.files.get(&file_id).cloned()
    }

    fn search_records(
        &self,
        filters: &RecordFilters,
        options: &RecordSearchOptions,
    ) -> RecordSearchResult {
        let candidates: Vec<&StoredRecord> = match filters.file_id {
            Some(file_id) => self.records.get(&file_id).into_iter().flatten().collect(),
            None => self.records.values().flatten().collect(),
        };

        let mut matched: Vec<StoredRecord> = candidates
            .into_iter()
            .filter(|record| matches_filters(record, filters))
            .cloned()
            .collect();
        let total = matched.len();

        matched.sort_by(|a, b| compare_records(a, b, options.order_by, options.direction));

        RecordSearchResult {
            records: paginate(matched, options.limit, options.offset),
            total: options.include_total.then_some(total),
        }
    }
}
