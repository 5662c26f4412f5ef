//! The decoded representation of one CDR line

use serde::{Deserialize, Serialize};

/// A single call-detail record
///
/// Which optional fields are populated depends on the encoding the record
/// came from (or is going to):
///
/// | Encoding | `mnc` | `dmcc` | `cell_id` | `ip` |
/// |----------|-------|--------|-----------|------|
/// | Basic    |       |        |           |      |
/// | Extended | yes   | yes    | yes       |      |
/// | Hex      | yes   |        | yes       | yes  |
///
/// Line numbers, raw text and timestamps are attached by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdrRecord {
    pub id: u64,
    pub bytes_used: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnc: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dmcc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl CdrRecord {
    /// Create a record carrying only the two mandatory fields
    pub fn new(id: u64, bytes_used: u64) -> Self {
        Self {
            id,
            bytes_used,
            ..Default::default()
        }
    }

    /// Record in the Extended shape
    pub fn extended(id: u64, dmcc: &str, mnc: u64, bytes_used: u64, cell_id: u64) -> Self {
        Self {
            id,
            bytes_used,
            mnc: Some(mnc),
            dmcc: Some(dmcc.to_string()),
            cell_id: Some(cell_id),
            ip: None,
        }
    }

    /// Record in the Hex shape
    pub fn hex(id: u64, mnc: u64, bytes_used: u64, cell_id: u64, ip: &str) -> Self {
        Self {
            id,
            bytes_used,
            mnc: Some(mnc),
            dmcc: None,
            cell_id: Some(cell_id),
            ip: Some(ip.to_string()),
        }
    }
}
