use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("no datetime pattern matched {input:?}")]
    Unmatched { input: String },

    /// A bare time of day where a calendar date is required.
    #[error("{input:?} has no calendar date")]
    MissingDate { input: String },
}

impl FormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self::Unmatched {
            input: input.into(),
        }
    }

    pub fn missing_date(input: impl Into<String>) -> Self {
        Self::MissingDate {
            input: input.into(),
        }
    }

    pub fn input(&self) -> &str {
        match self {
            Self::Unmatched { input } | Self::MissingDate { input } => input,
        }
    }
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("aggregation frame error: {0}")]
    Frame(#[from] PolarsError),

    #[error("aggregation produced invalid {column} value in row {row}")]
    InvalidValue { column: &'static str, row: usize },
}
