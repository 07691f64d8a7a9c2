//! Station observation transforms.
//!
//! - **datetime**: ordered pattern list and zone localization
//! - **sentinel**: removal of missing-reading codes
//! - **derive**: rained flag, time of day and month
//! - **aggregate**: per (month, time-of-day) mean/std/count

pub mod aggregate;
pub mod datetime;
pub mod derive;
pub mod error;
pub mod sentinel;

pub use aggregate::MonthlyAggregator;
pub use datetime::{DateInput, DatetimeNormalizer, DatetimePattern, PATTERNS, PatternKind};
pub use derive::DerivedFieldComputer;
pub use error::{AggregateError, FormatError};
pub use sentinel::SentinelFilter;
