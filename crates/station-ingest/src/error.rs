//! Error types for station export loading.

use std::path::PathBuf;

use station_transform::FormatError;
use thiserror::Error;

/// Errors that abort a load. Line numbers are 1-based file lines.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited data: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("source has no header row")]
    EmptySource,

    #[error("required column '{column}' not found")]
    MissingColumn { column: String },

    #[error("column '{column}' has no HHMM time token")]
    InvalidTimeToken { column: String },

    #[error("line {line}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("line {line}, column '{column}': {source}")]
    InvalidTimestamp {
        line: u64,
        column: String,
        #[source]
        source: FormatError,
    },
}

impl From<csv::Error> for LoadError {
    fn from(source: csv::Error) -> Self {
        Self::Csv { source }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
