//! Aggregated (month, time-of-day) statistics.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::calendar::MONTHS;
use crate::options::AggregateField;

/// Grouping key: calendar month plus wall-clock time of day.
///
/// Ordering is by month, then time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    pub month: u32,
    pub time_of_day: NaiveTime,
}

impl BucketKey {
    pub fn new(month: u32, time_of_day: NaiveTime) -> Self {
        Self { month, time_of_day }
    }
}

/// Mean, standard deviation and member count of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub mean: f64,
    /// Always finite and non-negative. Zero for single-member buckets.
    pub std: f64,
    pub count: usize,
}

impl BucketStats {
    /// Build stats, forcing `std` to zero when it is undefined.
    pub fn new(mean: f64, std: f64, count: usize) -> Self {
        let std = if count < 2 || !std.is_finite() {
            0.0
        } else {
            std.max(0.0)
        };
        Self { mean, std, count }
    }

    /// Lower edge of the one-sigma band, optionally clipped at zero.
    pub fn lower(&self, clip_at_zero: bool) -> f64 {
        let lower = self.mean - self.std;
        if clip_at_zero { lower.max(0.0) } else { lower }
    }

    /// Upper edge of the one-sigma band.
    pub fn upper(&self) -> f64 {
        self.mean + self.std
    }
}

/// One point on a month's diurnal curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time_of_day: NaiveTime,
    pub stats: BucketStats,
}

/// Buckets of a single month in ascending time-of-day order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSeries {
    pub month: u32,
    pub points: Vec<SeriesPoint>,
    /// Unweighted mean of the bucket means. `None` for an empty month.
    pub overall_mean: Option<f64>,
}

impl MonthSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn observation_count(&self) -> usize {
        self.points.iter().map(|point| point.stats.count).sum()
    }
}

/// Result of the monthly aggregation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub field: AggregateField,
    pub buckets: BTreeMap<BucketKey, BucketStats>,
}

impl Aggregates {
    pub fn new(field: AggregateField, buckets: BTreeMap<BucketKey, BucketStats>) -> Self {
        Self { field, buckets }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, month: u32, time_of_day: NaiveTime) -> Option<&BucketStats> {
        self.buckets.get(&BucketKey::new(month, time_of_day))
    }

    /// Sum of member counts over every bucket.
    pub fn total_count(&self) -> usize {
        self.buckets.values().map(|stats| stats.count).sum()
    }

    /// Unweighted mean of one month's bucket means.
    pub fn overall_mean(&self, month: u32) -> Option<f64> {
        let means: Vec<f64> = self
            .month_buckets(month)
            .map(|(_, stats)| stats.mean)
            .collect();
        if means.is_empty() {
            return None;
        }
        Some(means.iter().sum::<f64>() / means.len() as f64)
    }

    pub fn month_series(&self, month: u32) -> MonthSeries {
        let points = self
            .month_buckets(month)
            .map(|(key, stats)| SeriesPoint {
                time_of_day: key.time_of_day,
                stats: *stats,
            })
            .collect();
        MonthSeries {
            month,
            points,
            overall_mean: self.overall_mean(month),
        }
    }

    /// Twelve series in calendar order, empty months included.
    pub fn all_month_series(&self) -> Vec<MonthSeries> {
        MONTHS.iter().map(|&month| self.month_series(month)).collect()
    }

    fn month_buckets(&self, month: u32) -> impl Iterator<Item = (&BucketKey, &BucketStats)> {
        let start = BucketKey::new(month, NaiveTime::MIN);
        self.buckets
            .range(start..)
            .take_while(move |(key, _)| key.month == month)
    }
}
