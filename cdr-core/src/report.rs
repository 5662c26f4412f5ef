//! Whole-file parsing
//!
//! Runs every non-blank line of a CDR file through [`crate::decode`] and
//! collects the outcome per line. A bad line never aborts the file; it is
//! reported in [`ParseReport::invalid_records`] with the decode reason.

use serde::{Deserialize, Serialize};

use crate::codec::decode;
use crate::record::CdrRecord;

/// Name used when the caller does not supply one
pub const UNKNOWN_FILE_NAME: &str = "unknown";

/// A successfully decoded line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecord {
    /// 1-based line number in the source file
    pub line_number: usize,
    pub raw_line: String,
    #[serde(flatten)]
    pub record: CdrRecord,
}

/// A line that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineError {
    pub line_number: usize,
    pub content: String,
    pub reason: String,
}

/// Outcome of parsing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub file_name: String,
    pub total_lines: usize,
    pub parsed_lines: usize,
    pub skipped_lines: usize,
    pub errors: usize,
    pub records: Vec<ParsedRecord>,
    pub invalid_records: Vec<LineError>,
}

/// Parse the full text of a CDR file
///
/// Lines are separated by `\n` or `\r\n`. Whitespace-only lines are counted
/// as skipped. Every other line is decoded with surrounding whitespace
/// trimmed, and the report keeps the line as written.
pub fn parse_content(file_name: Option<&str>, content: &str) -> ParseReport {
    let mut report = ParseReport {
        file_name: file_name.unwrap_or(UNKNOWN_FILE_NAME).to_string(),
        total_lines: 0,
        parsed_lines: 0,
        skipped_lines: 0,
        errors: 0,
        records: Vec::new(),
        invalid_records: Vec::new(),
    };

    for (index, line) in content.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let line_number = index + 1;
        report.total_lines += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            report.skipped_lines += 1;
            continue;
        }

        match decode(trimmed) {
            Ok(record) => report.records.push(ParsedRecord {
                line_number,
                raw_line: line.to_string(),
                record,
            }),
            Err(e) => report.invalid_records.push(LineError {
                line_number,
                content: line.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    report.parsed_lines = report.records.len();
    report.errors = report.invalid_records.len();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let report = parse_content(Some("a.dat"), "2,1\r\n\n4,heyo,3,1,5\nbogus\n");
        assert_eq!(report.file_name, "a.dat");
        assert_eq!(report.total_lines, 5);
        assert_eq!(report.parsed_lines, 2);
        assert_eq!(report.skipped_lines, 2);
        assert_eq!(report.errors, 1);

        assert_eq!(report.records[0].line_number, 1);
        assert_eq!(report.records[0].raw_line, "2,1");
        assert_eq!(report.records[1].line_number, 3);
        assert_eq!(report.records[1].record.dmcc.as_deref(), Some("heyo"));

        let bad = &report.invalid_records[0];
        assert_eq!(bad.line_number, 4);
        assert_eq!(bad.content, "bogus");
        assert_eq!(bad.reason, "unable to detect encoding");
    }

    #[test]
    fn test_lines_are_trimmed_before_decode() {
        let report = parse_content(None, "2,1 \n 4,heyo,3,1,5\t\n x ");
        assert_eq!(report.file_name, UNKNOWN_FILE_NAME);
        assert_eq!(report.parsed_lines, 2);
        assert_eq!(report.records[0].record, CdrRecord::new(2, 1));
        assert_eq!(report.records[0].raw_line, "2,1 ");
        assert_eq!(
            report.records[1].record,
            CdrRecord::extended(4, "heyo", 3, 1, 5)
        );
        assert_eq!(report.records[1].raw_line, " 4,heyo,3,1,5\t");

        assert_eq!(report.errors, 1);
        assert_eq!(report.invalid_records[0].content, " x ");
    }

    #[test]
    fn test_codec_reason_is_kept() {
        let report = parse_content(None, "6,0003");
        assert_eq!(
            report.invalid_records[0].reason,
            "hex payload is 2 bytes, expected 12 or 24"
        );
    }

    #[test]
    fn test_json_is_flat() {
        let report = parse_content(Some("x"), "2,1");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["records"][0],
            serde_json::json!({
                "lineNumber": 1,
                "rawLine": "2,1",
                "id": 2,
                "bytesUsed": 1
            })
        );
        assert_eq!(json["parsedLines"], 1);
        assert_eq!(json["invalidRecords"], serde_json::json!([]));
    }
}
