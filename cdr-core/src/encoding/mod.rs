//! CDR wire encodings.
//!
//! Every line starts with a decimal id followed by a comma. The id modulo 10
//! decides how the rest of the line is laid out:
//!
//! | `id % 10` | Encoding   | Wire shape                                  |
//! |-----------|------------|---------------------------------------------|
//! | 4         | Extended   | `id,dmcc,mnc,bytesUsed,cellId`              |
//! | 6         | Hex        | `id,<12 or 24 bytes as hex>`                |
//! | other     | Basic      | `id,bytesUsed`                              |
//!
//! Each encoding module provides a pure `decode(&str)` and `encode(&CdrRecord)`
//! pair. [`Encoding`] routes to them with an exhaustive match, so a new
//! variant cannot be added without wiring both directions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::record::CdrRecord;

pub mod basic;
pub mod detect;
pub mod extended;
pub mod hex;

pub use detect::{detect_encoding, select_encoding};

/// The three wire sub-formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Basic,
    Extended,
    Hex,
}

impl Encoding {
    /// Classify a record id
    pub fn from_id(id: u64) -> Self {
        match id % 10 {
            4 => Encoding::Extended,
            6 => Encoding::Hex,
            _ => Encoding::Basic,
        }
    }

    /// Decode a full line with this encoding
    pub fn decode(self, line: &str) -> Result<CdrRecord, DecodeError> {
        match self {
            Encoding::Basic => basic::decode(line),
            Encoding::Extended => extended::decode(line),
            Encoding::Hex => hex::decode(line),
        }
    }

    /// Encode a record with this encoding
    pub fn encode(self, record: &CdrRecord) -> Result<String, EncodeError> {
        match self {
            Encoding::Basic => basic::encode(record),
            Encoding::Extended => extended::encode(record),
            Encoding::Hex => hex::encode(record),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Basic => "basic",
            Encoding::Extended => "extended",
            Encoding::Hex => "hex",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a base-10 unsigned integer field, rejecting empty input
pub(crate) fn parse_u64(field: &'static str, value: &str) -> Result<u64, DecodeError> {
    if value.is_empty() {
        return Err(DecodeError::EmptyField(field));
    }
    let invalid = || DecodeError::InvalidInteger {
        field,
        value: value.to_string(),
    };
    // u64::from_str also takes a leading '+'
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse::<u64>().map_err(|_| invalid())
}

/// Fetch a mandatory optional field for encoding
pub(crate) fn require<T>(
    encoding: Encoding,
    field: &'static str,
    value: Option<T>,
) -> Result<T, EncodeError> {
    value.ok_or(EncodeError::MissingField { encoding, field })
}
