use cdr_core::{decode, encode, parse_content, CdrRecord};

const SAMPLE: &str = include_str!("fixtures/cdr.dat");

fn expected_records() -> Vec<CdrRecord> {
    vec![
        CdrRecord::extended(4, "0d39f", 0, 495594, 214),
        CdrRecord::hex(16, 48771, 12921, 192, "99.229.230.61"),
        CdrRecord::new(9991, 2935),
        CdrRecord::hex(316, 3721, 12921, 578228938, "192.1.74.255"),
        CdrRecord::extended(7194, "b33", 394, 495593, 192),
        CdrRecord::new(7291, 293451),
    ]
}

#[test]
fn test_decodes_every_sample_line() {
    let records: Vec<CdrRecord> = SAMPLE
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| decode(line).unwrap_or_else(|e| panic!("{:?}: {}", line, e)))
        .collect();

    assert_eq!(records, expected_records());
}

#[test]
fn test_sample_lines_reencode_exactly() {
    for line in SAMPLE.lines().filter(|line| !line.is_empty()) {
        let record = decode(line).unwrap();
        assert_eq!(encode(&record).unwrap(), line);
    }
}

#[test]
fn test_sample_report() {
    let report = parse_content(Some("cdr.dat"), SAMPLE);

    // Trailing newline yields one empty, skipped line
    assert_eq!(report.total_lines, 7);
    assert_eq!(report.skipped_lines, 1);
    assert_eq!(report.parsed_lines, 6);
    assert_eq!(report.errors, 0);

    let decoded: Vec<CdrRecord> = report.records.into_iter().map(|r| r.record).collect();
    assert_eq!(decoded, expected_records());
}

#[test]
fn test_basic_lines_have_no_optionals() {
    for id in (0..200u64).filter(|id| id % 10 != 4 && id % 10 != 6) {
        let line = format!("{},{}", id, id * 3);
        assert_eq!(decode(&line), Ok(CdrRecord::new(id, id * 3)));
    }
}

#[test]
fn test_extended_lines_roundtrip() {
    for (id, dmcc) in [(4u64, "heyo"), (14, "0d39f"), (1234, "x"), (99994, "")] {
        let line = format!("{},{},310,{},{}", id, dmcc, id * 7, u32::MAX);
        let record = decode(&line).unwrap();
        assert_eq!(encode(&record).unwrap(), line);
    }
}

#[test]
fn test_hex_records_roundtrip() {
    let records = [
        CdrRecord::hex(6, 0, 0, 0, "0.0.0.0"),
        CdrRecord::hex(26, 2, 1, 3, "1.1.1.1"),
        CdrRecord::hex(1006, 65535, 4096, 4_000_000_000, "10.20.30.40"),
    ];
    for record in records {
        let line = encode(&record).unwrap();
        assert_eq!(decode(&line), Ok(record));
    }
}

#[test]
fn test_malformed_lines_never_panic() {
    let lines = [
        "", ",", ",,", ",a", "2", "4", "6", "a,b", "4,a,b,c,d", "6,xyz", "6,0", "18446744073709551616,1",
        "\u{1F600},1", "6,\u{00e9}\u{00e9}",
    ];
    for line in lines {
        assert!(decode(line).is_err(), "line {:?}", line);
    }
}
