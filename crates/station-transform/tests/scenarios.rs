//! Stage-level scenarios from the pipeline contract.

use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::America::Los_Angeles;
use station_model::{AggregateField, Observation, RainRule, SentinelSet, StdConvention};
use station_transform::{DatetimeNormalizer, DerivedFieldComputer, MonthlyAggregator, SentinelFilter};

fn normalizer() -> DatetimeNormalizer {
    DatetimeNormalizer::new(Los_Angeles, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
}

fn at(date: &str, value: f64) -> Observation {
    Observation::new(normalizer().parse(date).unwrap(), value)
}

#[test]
fn sentinel_row_is_dropped() {
    let filter = SentinelFilter::new(SentinelSet::new([999.99]));
    let kept = filter.filter(&[at("2020-01-01", 999.99), at("2020-01-01", 0.40)]);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].value, 0.40);
}

#[test]
fn rain_threshold_is_inclusive_by_default_rule() {
    let observations = [at("2020-01-01", 0.10), at("2020-01-01", 0.30), at("2020-01-01", 0.50)];
    let rained: Vec<bool> = DerivedFieldComputer::new(RainRule::AtLeast(0.3))
        .annotate(&observations)
        .iter()
        .map(|item| item.rained)
        .collect();
    assert_eq!(rained, vec![false, true, true]);
}

#[test]
fn strict_rule_excludes_threshold() {
    let rained: Vec<bool> = DerivedFieldComputer::new(RainRule::GreaterThan(0.0))
        .annotate(&[at("2020-01-01", 0.0), at("2020-01-01", 0.01)])
        .iter()
        .map(|item| item.rained)
        .collect();
    assert_eq!(rained, vec![false, true]);
}

#[test]
fn march_six_am_rate_bucket() {
    let observations = [at("2020-03-02 06:00", 1.0), at("2021-03-20 06:00", 0.0)];
    let annotated = DerivedFieldComputer::new(RainRule::AtLeast(0.5)).annotate(&observations);
    let aggregates = MonthlyAggregator::new(AggregateField::RainIndicator, StdConvention::Sample)
        .aggregate(&annotated)
        .unwrap();

    assert_eq!(aggregates.len(), 1);
    let stats = aggregates
        .get(3, NaiveTime::from_hms_opt(6, 0, 0).unwrap())
        .unwrap();
    assert_eq!(stats.count, 2);
    assert!((stats.mean - 0.5).abs() < 1e-12);
}

#[test]
fn overall_mean_is_unweighted_over_buckets() {
    let observations = [
        at("2020-04-01 00:00", 1.0),
        at("2020-04-02 00:00", 1.0),
        at("2020-04-03 00:00", 1.0),
        at("2020-04-01 12:00", 0.0),
    ];
    let annotated = DerivedFieldComputer::new(RainRule::AtLeast(0.5)).annotate(&observations);
    let aggregates = MonthlyAggregator::new(AggregateField::RainIndicator, StdConvention::Sample)
        .aggregate(&annotated)
        .unwrap();
    let april = aggregates.month_series(4);
    assert_eq!(april.overall_mean, Some(0.5));
    assert_eq!(aggregates.overall_mean(5), None);
}
