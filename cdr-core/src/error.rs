//! Error types for record decoding and encoding
//!
//! The `Display` text of every variant is the human-readable reason that
//! callers store next to a rejected line, so keep the messages stable.

use thiserror::Error;

use crate::encoding::Encoding;

/// Errors that can occur when decoding a CDR line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The leading id could not be read, so no encoding applies
    #[error("unable to detect encoding")]
    UndetectedEncoding,

    /// Line does not split into the number of fields the encoding requires
    #[error("{encoding} record expects {expected} fields, got {actual}")]
    FieldCount {
        encoding: Encoding,
        expected: usize,
        actual: usize,
    },

    /// A mandatory segment is empty
    #[error("field `{0}` is empty")]
    EmptyField(&'static str),

    /// A numeric segment is not a non-negative base-10 integer
    #[error("field `{field}` is not a valid integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },

    /// Hex payload has an odd length or contains non-hex characters
    #[error("invalid hex payload: {0}")]
    InvalidHex(String),

    /// Hex payload decoded to an unsupported number of bytes
    #[error("hex payload is {0} bytes, expected 12 or 24")]
    PayloadLength(usize),
}

impl From<hex::FromHexError> for DecodeError {
    fn from(e: hex::FromHexError) -> Self {
        DecodeError::InvalidHex(e.to_string())
    }
}

/// Errors that can occur when encoding a record to its wire form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The record lacks a field its target encoding mandates
    #[error("{encoding} encoding requires field `{field}`")]
    MissingField {
        encoding: Encoding,
        field: &'static str,
    },

    /// A numeric field does not fit the width of its wire slot
    #[error("field `{field}` value {value} exceeds {max}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// A text field contains the field delimiter
    #[error("field `{0}` must not contain ','")]
    DelimiterInField(&'static str),

    /// The ip field is not a dotted-decimal IPv4 address
    #[error("invalid IPv4 address: {0:?}")]
    InvalidIp(String),

    /// IPv6 addresses can be decoded but not encoded
    #[error("IPv6 address {0:?} cannot be encoded")]
    UnsupportedIpv6(String),
}
