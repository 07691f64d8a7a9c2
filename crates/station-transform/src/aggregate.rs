//! Monthly time-of-day aggregation.
//!
//! Observations are pooled by `(month, time_of_day)` across days and years
//! to estimate one diurnal curve per month. Only observed keys produce
//! buckets; absent time slots are never zero-filled.

use std::collections::BTreeMap;

use chrono::{NaiveTime, Timelike};
use polars::prelude::*;
use station_model::{
    AggregateField, Aggregates, AnnotatedObservation, BucketKey, BucketStats, StdConvention,
};
use tracing::debug;

use crate::error::AggregateError;

const MONTH: &str = "month";
const SECONDS: &str = "seconds";
const VALUE: &str = "value";
const MEAN: &str = "mean";
const STD: &str = "std";
const COUNT: &str = "count";

/// Groups annotated observations and computes mean, std and count per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyAggregator {
    field: AggregateField,
    convention: StdConvention,
}

impl MonthlyAggregator {
    pub fn new(field: AggregateField, convention: StdConvention) -> Self {
        Self { field, convention }
    }

    pub fn field(&self) -> AggregateField {
        self.field
    }

    pub fn aggregate(
        &self,
        annotated: &[AnnotatedObservation],
    ) -> Result<Aggregates, AggregateError> {
        if annotated.is_empty() {
            return Ok(Aggregates::new(self.field, BTreeMap::new()));
        }

        let grouped = self
            .observation_frame(annotated)?
            .lazy()
            .group_by([col(MONTH), col(SECONDS)])
            .agg([
                col(VALUE).mean().alias(MEAN),
                col(VALUE).std(self.convention.ddof()).alias(STD),
                col(VALUE).len().cast(DataType::UInt64).alias(COUNT),
            ])
            .collect()?;

        let buckets = collect_buckets(&grouped)?;
        debug!(
            buckets = buckets.len(),
            observations = annotated.len(),
            "observations grouped"
        );
        Ok(Aggregates::new(self.field, buckets))
    }

    fn observation_frame(&self, annotated: &[AnnotatedObservation]) -> PolarsResult<DataFrame> {
        let months: Vec<u32> = annotated.iter().map(|item| item.month).collect();
        let seconds: Vec<u32> = annotated
            .iter()
            .map(|item| item.time_of_day.num_seconds_from_midnight())
            .collect();
        let values: Vec<f64> = annotated
            .iter()
            .map(|item| match self.field {
                AggregateField::RainIndicator => item.rain_indicator(),
                AggregateField::Value => item.value(),
            })
            .collect();

        df! {
            MONTH => months,
            SECONDS => seconds,
            VALUE => values,
        }
    }
}

fn collect_buckets(
    grouped: &DataFrame,
) -> Result<BTreeMap<BucketKey, BucketStats>, AggregateError> {
    let months = grouped.column(MONTH)?.u32()?;
    let seconds = grouped.column(SECONDS)?.u32()?;
    let means = grouped.column(MEAN)?.f64()?;
    let stds = grouped.column(STD)?.f64()?;
    let counts = grouped.column(COUNT)?.u64()?;

    let mut buckets = BTreeMap::new();
    for row in 0..grouped.height() {
        let month = months
            .get(row)
            .ok_or(AggregateError::InvalidValue { column: MONTH, row })?;
        let time_of_day = seconds
            .get(row)
            .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0))
            .ok_or(AggregateError::InvalidValue {
                column: SECONDS,
                row,
            })?;
        let mean = means
            .get(row)
            .ok_or(AggregateError::InvalidValue { column: MEAN, row })?;
        let count = counts
            .get(row)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or(AggregateError::InvalidValue { column: COUNT, row })?;
        // Null for single-member groups; BucketStats maps it to zero.
        let std = stds.get(row).unwrap_or(f64::NAN);

        buckets.insert(
            BucketKey::new(month, time_of_day),
            BucketStats::new(mean, std, count),
        );
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;
    use station_model::{Observation, RainRule};

    use crate::derive::DerivedFieldComputer;

    fn annotated(day: u32, hour: u32, minute: u32, value: f64) -> AnnotatedObservation {
        let timestamp = Los_Angeles
            .with_ymd_and_hms(2020, 3, day, hour, minute, 0)
            .single()
            .unwrap();
        DerivedFieldComputer::new(RainRule::AtLeast(0.5)).annotate_one(Observation::new(timestamp, value))
    }

    fn six_am() -> NaiveTime {
        NaiveTime::from_hms_opt(6, 0, 0).unwrap()
    }

    #[test]
    fn pools_days_into_one_bucket() {
        let aggregator = MonthlyAggregator::new(AggregateField::RainIndicator, StdConvention::Sample);
        let result = aggregator
            .aggregate(&[annotated(1, 6, 0, 1.0), annotated(17, 6, 0, 0.0)])
            .unwrap();
        assert_eq!(result.len(), 1);
        let stats = result.get(3, six_am()).unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert!((stats.std - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn population_convention_divides_by_n() {
        let aggregator = MonthlyAggregator::new(AggregateField::Value, StdConvention::Population);
        let result = aggregator
            .aggregate(&[annotated(1, 6, 0, 1.0), annotated(2, 6, 0, 3.0)])
            .unwrap();
        let stats = result.get(3, six_am()).unwrap();
        assert!((stats.mean - 2.0).abs() < 1e-12);
        assert!((stats.std - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_member_bucket_has_zero_std() {
        let aggregator = MonthlyAggregator::new(AggregateField::Value, StdConvention::Sample);
        let result = aggregator.aggregate(&[annotated(5, 6, 0, 0.25)]).unwrap();
        let stats = result.get(3, six_am()).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, 0.0);
        assert!((stats.mean - 0.25).abs() < 1e-12);
    }

    #[test]
    fn empty_input_has_no_buckets() {
        let aggregator = MonthlyAggregator::new(AggregateField::Value, StdConvention::Sample);
        let result = aggregator.aggregate(&[]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.field, AggregateField::Value);
    }

    #[test]
    fn distinct_times_stay_separate() {
        let aggregator = MonthlyAggregator::new(AggregateField::Value, StdConvention::Sample);
        let result = aggregator
            .aggregate(&[annotated(1, 6, 0, 1.0), annotated(1, 6, 15, 2.0)])
            .unwrap();
        let series = result.month_series(3);
        let times: Vec<NaiveTime> = series.points.iter().map(|p| p.time_of_day).collect();
        assert_eq!(times, vec![six_am(), NaiveTime::from_hms_opt(6, 15, 0).unwrap()]);
    }
}
