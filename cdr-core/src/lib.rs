//! # CDR Core
//!
//! Platform-independent codec for call-detail-record (CDR) text lines.
//!
//! This crate contains pure parsing and formatting logic with **zero I/O
//! dependencies**. Reading files, storing records and serving them over HTTP
//! live in `cdr-server`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  cdr-core (pure, no tokio/async deps)                    │
//! │  ├── encoding/   detect + basic / extended / hex codecs  │
//! │  ├── codec       decode(line) / encode(record)           │
//! │  └── report      per-file parse report                   │
//! └──────────────────────────────────────────────────────────┘
//!                         ▲
//!            ┌────────────┴────────────┐
//!            │  cdr-server             │
//!            │  (storage, REST, CLI)   │
//!            └─────────────────────────┘
//! ```
//!
//! ## Wire Formats
//!
//! | `id % 10` | Encoding | Example                           |
//! |-----------|----------|-----------------------------------|
//! | 4         | Extended | `4,heyo,3,1,5`                    |
//! | 6         | Hex      | `6,000300010000000501010101`      |
//! | other     | Basic    | `2,1`                             |
//!
//! ## Example: Decoding and Encoding
//!
//! ```rust
//! use cdr_core::{decode, encode, CdrRecord};
//!
//! let record = decode("6,000300010000000501010101").unwrap();
//! assert_eq!(record, CdrRecord::hex(6, 3, 1, 5, "1.1.1.1"));
//!
//! assert_eq!(encode(&CdrRecord::new(2, 1)).unwrap(), "2,1");
//!
//! let err = decode("no comma here").unwrap_err();
//! assert_eq!(err.to_string(), "unable to detect encoding");
//! ```
//!
//! ## Example: Parsing a File
//!
//! ```rust
//! use cdr_core::report::parse_content;
//!
//! let report = parse_content(Some("cdr.dat"), "2,1\n\nbad\n");
//! assert_eq!(report.parsed_lines, 1);
//! assert_eq!(report.skipped_lines, 2);
//! assert_eq!(report.errors, 1);
//! ```

pub mod codec;
pub mod encoding;
pub mod error;
pub mod record;
pub mod report;

// Re-export commonly used types
pub use codec::{decode, encode};
pub use encoding::{detect_encoding, select_encoding, Encoding};
pub use error::{DecodeError, EncodeError};
pub use record::CdrRecord;
pub use report::{parse_content, LineError, ParseReport, ParsedRecord};
