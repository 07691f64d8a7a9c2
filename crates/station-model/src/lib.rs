//! Data model for station measurement processing.
//!
//! - **observation**: canonical per-reading records and their annotated form
//! - **aggregate**: (month, time-of-day) buckets and per-month series
//! - **options**: run configuration with documented defaults
//! - **calendar**: month numbering and names
//! - **timezone**: zone name resolution

pub mod aggregate;
pub mod calendar;
pub mod error;
pub mod observation;
pub mod options;
pub mod timezone;

pub use aggregate::{Aggregates, BucketKey, BucketStats, MonthSeries, SeriesPoint};
pub use calendar::{MONTHS, month_name};
pub use error::{OptionsError, Result};
pub use observation::{AnnotatedObservation, Observation};
pub use options::{
    AggregateField, AggregationMode, AxisScaling, ChartOptions, ColumnOptions, DEFAULT_CHART_HEIGHT,
    DEFAULT_CHART_TITLE, DEFAULT_DATE_COLUMN, DEFAULT_OUTPUT_BASE, DEFAULT_RAIN_THRESHOLD,
    DEFAULT_SENTINELS, DEFAULT_STATION, DEFAULT_VALUE_COLUMN, DEFAULT_VALUE_MARKER, OutputOptions,
    PROBABILITY_AXIS, PipelineOptions, RainRule, RawTraceStyle, SentinelSet, StdConvention,
    validate_threshold,
};
pub use timezone::{DEFAULT_TIMEZONE, resolve_timezone};
