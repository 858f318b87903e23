//! Error taxonomy for loading and aggregating rating data.
//!
//! Every variant is fatal: the binary logs it and exits without writing a
//! report.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A required input path could not be opened or listed.
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The csv reader could not decode the underlying bytes.
    #[error("failed to read records from {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// A record had the wrong number of fields.
    #[error("invalid record in {origin} at line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        origin: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A single field failed to parse.
    #[error("invalid {field} {value:?} in {origin} at line {line}: {reason}")]
    InvalidField {
        origin: String,
        line: u64,
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
