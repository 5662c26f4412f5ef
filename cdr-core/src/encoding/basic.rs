//! Basic encoding: `id,bytesUsed`

use super::{parse_u64, Encoding};
use crate::error::{DecodeError, EncodeError};
use crate::record::CdrRecord;

const FIELD_COUNT: usize = 2;

pub fn decode(line: &str) -> Result<CdrRecord, DecodeError> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != FIELD_COUNT {
        return Err(DecodeError::FieldCount {
            encoding: Encoding::Basic,
            expected: FIELD_COUNT,
            actual: parts.len(),
        });
    }

    let id = parse_u64("id", parts[0])?;
    let bytes_used = parse_u64("bytesUsed", parts[1])?;

    Ok(CdrRecord::new(id, bytes_used))
}

/// Optional fields are ignored; Basic carries only the mandatory pair.
pub fn encode(record: &CdrRecord) -> Result<String, EncodeError> {
    Ok(format!("{},{}", record.id, record.bytes_used))
}
