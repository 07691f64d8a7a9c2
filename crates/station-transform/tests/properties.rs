//! Property tests for the transform stages.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use proptest::prelude::*;
use station_model::{AggregateField, Observation, RainRule, SentinelSet, StdConvention};
use station_transform::{
    DatetimeNormalizer, DerivedFieldComputer, MonthlyAggregator, PATTERNS, PatternKind,
    SentinelFilter,
};

fn naive_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (1960i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(
        |(year, month, day, hour, minute, second)| {
            NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|date| date.and_hms_opt(hour, minute, second))
                .unwrap()
        },
    )
}

fn fixed_zone() -> impl Strategy<Value = Tz> {
    prop_oneof![Just(Tz::UTC), Just(chrono_tz::Asia::Tokyo)]
}

proptest! {
    #[test]
    fn every_pattern_round_trips(value in naive_datetime(), zone in fixed_zone()) {
        let reference = NaiveDate::from_ymd_opt(2001, 2, 3).unwrap();
        let normalizer = DatetimeNormalizer::new(zone, reference);
        for pattern in PATTERNS {
            let rendered = pattern.render(value);
            let parsed = normalizer.parse(rendered.as_str()).unwrap();
            prop_assert_eq!(parsed.timezone(), zone);
            match pattern.kind {
                PatternKind::DateTime => {
                    prop_assert_eq!(parsed.date_naive(), value.date());
                    prop_assert_eq!((parsed.hour(), parsed.minute()), (value.hour(), value.minute()));
                    if pattern.format.contains("%S") {
                        prop_assert_eq!(parsed.second(), value.second());
                    }
                }
                PatternKind::Date => {
                    prop_assert_eq!(parsed.date_naive(), value.date());
                    prop_assert_eq!(parsed.time(), NaiveTime::MIN);
                }
                PatternKind::TimeOnly => {
                    prop_assert_eq!(parsed.date_naive(), reference);
                    prop_assert_eq!((parsed.hour(), parsed.minute()), (value.hour(), value.minute()));
                }
            }
        }
    }

    #[test]
    fn sentinel_filter_is_idempotent(
        values in prop::collection::vec(
            prop_oneof![Just(999.99), Just(-9999.99), Just(-9999.0), 0.0f64..5.0],
            0..64,
        )
    ) {
        let timestamp = Tz::UTC.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().unwrap();
        let observations: Vec<Observation> =
            values.iter().map(|value| Observation::new(timestamp, *value)).collect();
        let filter = SentinelFilter::new(SentinelSet::default());
        let once = filter.filter(&observations);
        let twice = filter.filter(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.iter().all(|observation| !SentinelSet::default().contains(observation.value)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn aggregation_conserves_counts_and_bands_are_valid(
        readings in prop::collection::vec((1u32..=12, 0u32..4, 0u32..4, 0.0f64..1.0), 1..120)
    ) {
        let observations: Vec<Observation> = readings
            .iter()
            .map(|(month, hour, quarter, value)| {
                let timestamp = Tz::UTC
                    .with_ymd_and_hms(2019, *month, 10, *hour, quarter * 15, 0)
                    .single()
                    .unwrap();
                Observation::new(timestamp, *value)
            })
            .collect();
        let annotated = DerivedFieldComputer::new(RainRule::AtLeast(0.5)).annotate(&observations);
        let aggregates = MonthlyAggregator::new(AggregateField::RainIndicator, StdConvention::Sample)
            .aggregate(&annotated)
            .unwrap();

        prop_assert_eq!(aggregates.total_count(), observations.len());
        for (key, stats) in &aggregates.buckets {
            prop_assert!(stats.count > 0);
            prop_assert!(stats.std >= 0.0);
            prop_assert!(stats.lower(true) <= stats.mean + 1e-12);
            prop_assert!(stats.mean <= stats.upper() + 1e-12);
            prop_assert!((0.0..=1.0).contains(&stats.mean));
            prop_assert!(annotated.iter().any(|item| item.month == key.month && item.time_of_day == key.time_of_day));
        }
        for series in aggregates.all_month_series() {
            let months_seen = annotated.iter().filter(|item| item.month == series.month).count();
            prop_assert_eq!(series.observation_count(), months_seen);
            prop_assert_eq!(series.is_empty(), months_seen == 0);
        }
    }
}

#[test]
fn pattern_order_is_most_specific_first() {
    let order: Vec<String> = PATTERNS
        .iter()
        .map(|pattern| format!("{} {}", pattern.name, pattern.format))
        .collect();
    insta::assert_snapshot!(order.join("\n"), @r"
    iso-datetime %Y-%m-%dT%H:%M:%S
    datetime-seconds %Y-%m-%d %H:%M:%S
    datetime-minutes %Y-%m-%d %H:%M
    compact-datetime %Y%m%d %H:%M
    iso-date %Y-%m-%d
    compact-date %Y%m%d
    dotted-date %d.%m.%Y
    us-date %m/%d/%Y
    time-only %H:%M
    ");
}
