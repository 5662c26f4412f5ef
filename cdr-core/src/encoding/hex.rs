//! Hex encoding: `id,<payload>`
//!
//! The payload is a hex string (either case) holding a big-endian binary
//! structure in one of two sizes:
//!
//! ```text
//!  offset  size  field
//!  0       2     mnc        (u16)
//!  2       2     bytesUsed  (u16)
//!  4       4     cellId     (u32)
//!  8       4     IPv4 address          -- 12 byte payload
//!  8       16    IPv6 address          -- 24 byte payload
//! ```
//!
//! IPv6 addresses are rendered as eight zero-padded 4-digit groups without
//! `::` compression; consumers parse that fixed form. Only the IPv4 payload
//! can be encoded.
//!
//! Older data may use a 12 byte layout with a 16-bit cellId at offset 4 and
//! the IPv4 address at offset 6. It reads the same bytes differently, so it
//! is only available through [`decode_legacy`].

use super::{parse_u64, require, Encoding};
use crate::error::{DecodeError, EncodeError};
use crate::record::CdrRecord;

const FIELD_COUNT: usize = 2;

/// Payload size carrying an IPv4 address
pub const IPV4_PAYLOAD_LEN: usize = 12;
/// Payload size carrying an IPv6 address
pub const IPV6_PAYLOAD_LEN: usize = 24;

const ADDRESS_OFFSET: usize = 8;

fn split_line(line: &str) -> Result<(u64, Vec<u8>), DecodeError> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != FIELD_COUNT {
        return Err(DecodeError::FieldCount {
            encoding: Encoding::Hex,
            expected: FIELD_COUNT,
            actual: parts.len(),
        });
    }

    let id = parse_u64("id", parts[0])?;
    let payload = ::hex::decode(parts[1])?;
    Ok((id, payload))
}

pub fn decode(line: &str) -> Result<CdrRecord, DecodeError> {
    let (id, payload) = split_line(line)?;

    let ip = match payload.len() {
        IPV4_PAYLOAD_LEN => format_ipv4(&payload[ADDRESS_OFFSET..IPV4_PAYLOAD_LEN]),
        IPV6_PAYLOAD_LEN => format_ipv6(&payload[ADDRESS_OFFSET..IPV6_PAYLOAD_LEN]),
        len => return Err(DecodeError::PayloadLength(len)),
    };

    let mnc = u16::from_be_bytes([payload[0], payload[1]]);
    let bytes_used = u16::from_be_bytes([payload[2], payload[3]]);
    let cell_id = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);

    Ok(CdrRecord::hex(
        id,
        mnc as u64,
        bytes_used as u64,
        cell_id as u64,
        &ip,
    ))
}

/// Decode the deprecated 12 byte layout (16-bit cellId, IPv4 at offset 6)
///
/// Not used by [`crate::decode`]. Bytes 10 and 11 are ignored.
#[deprecated(note = "historical layout; use `decode` for current data")]
pub fn decode_legacy(line: &str) -> Result<CdrRecord, DecodeError> {
    let (id, payload) = split_line(line)?;
    if payload.len() != IPV4_PAYLOAD_LEN {
        return Err(DecodeError::PayloadLength(payload.len()));
    }

    let mnc = u16::from_be_bytes([payload[0], payload[1]]);
    let bytes_used = u16::from_be_bytes([payload[2], payload[3]]);
    let cell_id = u16::from_be_bytes([payload[4], payload[5]]);
    let ip = format_ipv4(&payload[6..10]);

    Ok(CdrRecord::hex(
        id,
        mnc as u64,
        bytes_used as u64,
        cell_id as u64,
        &ip,
    ))
}

pub fn encode(record: &CdrRecord) -> Result<String, EncodeError> {
    let mnc = require(Encoding::Hex, "mnc", record.mnc)?;
    let cell_id = require(Encoding::Hex, "cellId", record.cell_id)?;
    let ip = require(Encoding::Hex, "ip", record.ip.as_deref())?;

    let mnc = fit_u16("mnc", mnc)?;
    let bytes_used = fit_u16("bytesUsed", record.bytes_used)?;
    let cell_id = u32::try_from(cell_id).map_err(|_| EncodeError::OutOfRange {
        field: "cellId",
        value: cell_id,
        max: u32::MAX as u64,
    })?;

    if ip.contains(':') {
        return Err(EncodeError::UnsupportedIpv6(ip.to_string()));
    }
    let address = parse_ipv4(ip).ok_or_else(|| EncodeError::InvalidIp(ip.to_string()))?;

    let mut payload = Vec::with_capacity(IPV4_PAYLOAD_LEN);
    payload.extend_from_slice(&mnc.to_be_bytes());
    payload.extend_from_slice(&bytes_used.to_be_bytes());
    payload.extend_from_slice(&cell_id.to_be_bytes());
    payload.extend_from_slice(&address);

    Ok(format!("{},{}", record.id, ::hex::encode(payload)))
}

/// Four dot-separated decimal octets; leading zeros are allowed
fn parse_ipv4(ip: &str) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut parts = ip.split('.');
    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}

fn fit_u16(field: &'static str, value: u64) -> Result<u16, EncodeError> {
    u16::try_from(value).map_err(|_| EncodeError::OutOfRange {
        field,
        value,
        max: u16::MAX as u64,
    })
}

fn format_ipv4(bytes: &[u8]) -> String {
    format!("{}.{}.{}.{}", bytes[0], bytes[1], bytes[2], bytes[3])
}

fn format_ipv6(bytes: &[u8]) -> String {
    bytes
        .chunks_exact(2)
        .map(|pair| format!("{:04x}", u16::from_be_bytes([pair[0], pair[1]])))
        .collect::<Vec<_>>()
        .join(":")
}
