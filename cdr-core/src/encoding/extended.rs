//! Extended encoding: `id,dmcc,mnc,bytesUsed,cellId`
//!
//! `dmcc` is opaque text taken verbatim. It cannot contain a comma since the
//! format has no escaping.

use super::{parse_u64, require, Encoding};
use crate::error::{DecodeError, EncodeError};
use crate::record::CdrRecord;

const FIELD_COUNT: usize = 5;

pub fn decode(line: &str) -> Result<CdrRecord, DecodeError> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != FIELD_COUNT {
        return Err(DecodeError::FieldCount {
            encoding: Encoding::Extended,
            expected: FIELD_COUNT,
            actual: parts.len(),
        });
    }

    let id = parse_u64("id", parts[0])?;
    let dmcc = parts[1];
    let mnc = parse_u64("mnc", parts[2])?;
    let bytes_used = parse_u64("bytesUsed", parts[3])?;
    let cell_id = parse_u64("cellId", parts[4])?;

    Ok(CdrRecord::extended(id, dmcc, mnc, bytes_used, cell_id))
}

pub fn encode(record: &CdrRecord) -> Result<String, EncodeError> {
    let dmcc = require(Encoding::Extended, "dmcc", record.dmcc.as_deref())?;
    let mnc = require(Encoding::Extended, "mnc", record.mnc)?;
    let cell_id = require(Encoding::Extended, "cellId", record.cell_id)?;

    if dmcc.contains(',') {
        return Err(EncodeError::DelimiterInField("dmcc"));
    }

    Ok(format!(
        "{},{},{},{},{}",
        record.id, dmcc, mnc, record.bytes_used, cell_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(
            decode("4,heyo,3,1,5"),
            Ok(CdrRecord::extended(4, "heyo", 3, 1, 5))
        );
        assert_eq!(
            decode("7194,b33,394,495593,192"),
            Ok(CdrRecord::extended(7194, "b33", 394, 495593, 192))
        );
    }

    #[test]
    fn test_decode_empty_dmcc_is_kept() {
        assert_eq!(decode("4,,3,1,5"), Ok(CdrRecord::extended(4, "", 3, 1, 5)));
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            decode("4"),
            Err(DecodeError::FieldCount { actual: 1, .. })
        ));
        assert!(matches!(
            decode("4,a,b,c,d,e"),
            Err(DecodeError::FieldCount { actual: 6, .. })
        ));
        assert!(matches!(
            decode("4,heyo,x,1,5"),
            Err(DecodeError::InvalidInteger { field: "mnc", .. })
        ));
        assert!(matches!(
            decode("4,heyo,3,1,"),
            Err(DecodeError::EmptyField("cellId"))
        ));
    }

    #[test]
    fn test_encode_field_order() {
        let record = CdrRecord::extended(4, "heyo", 3, 1, 5);
        assert_eq!(encode(&record).unwrap(), "4,heyo,3,1,5");
    }

    #[test]
    fn test_encode_missing_fields() {
        let mut record = CdrRecord::extended(4, "heyo", 3, 1, 5);
        record.cell_id = None;
        assert_eq!(
            encode(&record),
            Err(EncodeError::MissingField {
                encoding: Encoding::Extended,
                field: "cellId"
            })
        );
        assert!(encode(&CdrRecord::new(4, 1)).is_err());
    }

    #[test]
    fn test_encode_rejects_comma_in_dmcc() {
        let record = CdrRecord::extended(4, "a,b", 3, 1, 5);
        assert_eq!(encode(&record), Err(EncodeError::DelimiterInField("dmcc")));
    }
}
