//! Top-level decode/encode entry points
//!
//! Both functions are pure and hold no state, so they can be called from any
//! number of threads at once.

use log::trace;

use crate::encoding::{detect_encoding, select_encoding};
use crate::error::{DecodeError, EncodeError};
use crate::record::CdrRecord;

/// Decode one line (no trailing newline, not trimmed)
pub fn decode(line: &str) -> Result<CdrRecord, DecodeError> {
    let encoding = detect_encoding(line).ok_or(DecodeError::UndetectedEncoding)?;

    encoding.decode(line).inspect_err(|e| {
        trace!("{} decode of {:?} failed: {}", encoding, line, e);
    })
}

/// Encode a record with the encoding its id selects
pub fn encode(record: &CdrRecord) -> Result<String, EncodeError> {
    let encoding = select_encoding(record);

    encoding.encode(record).inspect_err(|e| {
        trace!("{} encode of record {} failed: {}", encoding, record.id, e);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_each_encoding() {
        assert_eq!(decode("2,1"), Ok(CdrRecord::new(2, 1)));
        assert_eq!(
            decode("4,heyo,3,1,5"),
            Ok(CdrRecord::extended(4, "heyo", 3, 1, 5))
        );
        assert_eq!(
            decode("6,000300010000000501010101"),
            Ok(CdrRecord::hex(6, 3, 1, 5, "1.1.1.1"))
        );
    }

    #[test]
    fn test_decode_failures() {
        for line in ["", ",a", "2", "4", "6", "abc,1"] {
            assert_eq!(
                decode(line),
                Err(DecodeError::UndetectedEncoding),
                "line {:?}",
                line
            );
        }
        assert_eq!(
            DecodeError::UndetectedEncoding.to_string(),
            "unable to detect encoding"
        );
    }

    #[test]
    fn test_decode_propagates_codec_error() {
        // Detected as Extended but carries only two fields
        assert!(matches!(
            decode("14,5"),
            Err(DecodeError::FieldCount { expected: 5, .. })
        ));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(&CdrRecord::new(2, 1)).unwrap(), "2,1");
        assert_eq!(
            encode(&CdrRecord::extended(4, "heyo", 3, 1, 5)).unwrap(),
            "4,heyo,3,1,5"
        );
        assert_eq!(
            encode(&CdrRecord::hex(6, 3, 1, 5, "1.1.1.1")).unwrap(),
            "6,000300010000000501010101"
        );
    }

    #[test]
    fn test_encode_uses_id_not_fields() {
        // Hex-shaped record whose id selects Basic
        let record = CdrRecord::hex(7, 3, 1, 5, "1.1.1.1");
        assert_eq!(encode(&record).unwrap(), "7,1");
        // Basic-shaped record whose id selects Extended
        assert!(encode(&CdrRecord::new(14, 1)).is_err());
    }

    #[test]
    fn test_concurrent_calls() {
        let handles: Vec<_> = (0..8u64)
            .map(|n| {
                std::thread::spawn(move || {
                    for i in 0..200u64 {
                        let id = n * 1000 + i * 10 + 2;
                        let line = format!("{},{}", id, i);
                        let record = decode(&line).unwrap();
                        assert_eq!(encode(&record).unwrap(), line);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
