//! Encoding detection from a line's leading id

use super::Encoding;
use crate::record::CdrRecord;

/// Classify a raw line by the id before its first comma
///
/// Returns `None` when there is no comma, when either side of the first
/// comma is empty, or when the id is not a base-10 integer. Leading zeros
/// are accepted.
pub fn detect_encoding(line: &str) -> Option<Encoding> {
    let (id, rest) = line.split_once(',')?;
    if id.is_empty() || rest.is_empty() {
        return None;
    }
    let id = super::parse_u64("id", id).ok()?;
    Some(Encoding::from_id(id))
}

/// Pick the encoding a record re-encodes to
pub fn select_encoding(record: &CdrRecord) -> Encoding {
    Encoding::from_id(record.id)
}
