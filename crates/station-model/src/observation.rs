//! Observation records.

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

/// One measurement at one instant.
///
/// The timestamp is always zone-qualified. Values reaching this type are
/// finite; sentinel codes are removed before annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Tz>,
    /// Wall-clock reading as written in the source. Differs from the
    /// timestamp's local time only inside a DST gap, where the instant is
    /// shifted forward but the reading keeps its own time of day.
    pub wall_clock: NaiveDateTime,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Tz>, value: f64) -> Self {
        Self::recorded(timestamp, timestamp.naive_local(), value)
    }

    pub fn recorded(timestamp: DateTime<Tz>, wall_clock: NaiveDateTime, value: f64) -> Self {
        Self {
            timestamp,
            wall_clock,
            value,
        }
    }
}

/// Observation with the fields derived for aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedObservation {
    pub observation: Observation,
    /// Wall-clock time of the reading, date discarded.
    pub time_of_day: NaiveTime,
    pub rained: bool,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl AnnotatedObservation {
    pub fn timestamp(&self) -> DateTime<Tz> {
        self.observation.timestamp
    }

    pub fn value(&self) -> f64 {
        self.observation.value
    }

    /// The rained flag as a 0/1 indicator.
    pub fn rain_indicator(&self) -> f64 {
        if self.rained { 1.0 } else { 0.0 }
    }
}
