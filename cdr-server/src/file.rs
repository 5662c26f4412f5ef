//! Reading and writing CDR line files for the command line tools.

use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

use cdr_core::{encode, CdrRecord};

#[derive(Error, Debug)]
pub enum FileError {
    #[error("Cannot read {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Cannot parse records in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Write failed")]
    Write(#[from] io::Error),
}

/// Read a whole CDR file as text
pub fn read_content(path: &Path) -> Result<String, FileError> {
    let read_error = |source| FileError::Read {
        path: path.display().to_string(),
        source,
    };

    let mut content = String::new();
    BufReader::new(File::open(path).map_err(read_error)?)
        .read_to_string(&mut content)
        .map_err(read_error)?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Read a JSON array of records
pub fn read_records(path: &Path) -> Result<Vec<CdrRecord>, FileError> {
    let content = read_content(path)?;
    serde_json::from_str(&content).map_err(|source| FileError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Write each line followed by `\n`, returning the number written
pub fn write_lines<W, I, S>(writer: W, lines: I) -> Result<usize, FileError>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = BufWriter::new(writer);
    let mut count = 0;
    for line in lines {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Encode records to wire lines, skipping (and logging) those that fail
pub fn encode_records(records: &[CdrRecord]) -> (Vec<String>, usize) {
    let mut failed = 0;
    let lines = records
        .iter()
        .filter_map(|record| match encode(record) {
            Ok(line) => Some(line),
            Err(e) => {
                warn!("Cannot encode record {}: {}", record.id, e);
                failed += 1;
                None
            }
        })
        .collect();
    (lines, failed)
}
