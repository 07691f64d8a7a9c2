//! Errors raised while building run options.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OptionsError>;

#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("unknown timezone: {name}")]
    UnknownTimezone { name: String },

    #[error("invalid axis range: min {min} must be below max {max}")]
    InvalidAxisRange { min: f64, max: f64 },

    #[error("invalid rain threshold {value}: must be a finite, non-negative number")]
    InvalidThreshold { value: f64 },
}
