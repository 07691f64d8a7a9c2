//! Chart composition contracts.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::America::Los_Angeles;
use station_model::{
    AggregateField, AggregationMode, AnnotatedObservation, AxisScaling, ChartOptions, Observation,
    RainRule, RawTraceStyle, StdConvention,
};
use station_report::{ChartComposer, ChartSpec};
use station_transform::{DatetimeNormalizer, DerivedFieldComputer, MonthlyAggregator};

fn annotate(readings: &[(&str, f64)]) -> Vec<AnnotatedObservation> {
    let normalizer =
        DatetimeNormalizer::new(Los_Angeles, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    let observations: Vec<Observation> = readings
        .iter()
        .map(|(stamp, value)| Observation::new(normalizer.parse(*stamp).unwrap(), *value))
        .collect();
    DerivedFieldComputer::new(RainRule::AtLeast(0.01)).annotate(&observations)
}

fn rate_chart(readings: &[(&str, f64)]) -> ChartSpec {
    let annotated = annotate(readings);
    let aggregates = MonthlyAggregator::new(AggregateField::RainIndicator, StdConvention::Sample)
        .aggregate(&annotated)
        .unwrap();
    ChartComposer::new(
        AggregationMode::RateWithBand,
        AggregationMode::RateWithBand.default_axis_scaling(),
        ChartOptions::default(),
    )
    .compose_aggregated(&aggregates)
}

#[test]
fn always_twelve_axes_even_without_data() {
    let chart = rate_chart(&[]);
    assert!(chart.data.is_empty());
    let keys: Vec<&str> = chart.layout.yaxes.keys().map(String::as_str).collect();
    insta::assert_snapshot!(
        keys.join(","),
        @"yaxis,yaxis10,yaxis11,yaxis12,yaxis2,yaxis3,yaxis4,yaxis5,yaxis6,yaxis7,yaxis8,yaxis9"
    );
    let december = chart.layout.yaxis("yaxis12").unwrap();
    assert_eq!(december.title.text, "December");
    assert!((december.domain[1] - 1.0).abs() < 1e-12);
    assert_eq!(chart.layout.yaxis("yaxis").unwrap().domain[0], 0.0);
}

#[test]
fn rate_panel_has_band_mean_and_reference_line() {
    let chart = rate_chart(&[
        ("2020-03-02 06:00", 0.2),
        ("2020-03-09 06:00", 0.0),
        ("2020-03-09 06:15", 0.0),
    ]);
    let march: Vec<_> = chart.traces_on("y3").collect();
    assert_eq!(march.len(), 4);

    let (upper, lower, mean, overall) = (march[0], march[1], march[2], march[3]);
    assert_eq!(lower.fill.as_deref(), Some("tonexty"));
    assert_eq!(mean.name, "March");
    assert_eq!(mean.x, vec!["2000-01-01 06:00:00", "2000-01-01 06:15:00"]);
    assert_eq!(mean.y, vec![0.5, 0.0]);
    assert_eq!(mean.text, vec!["n=2", "n=1"]);
    assert!(lower.y.iter().all(|value| *value >= 0.0));
    assert!(upper.y.iter().zip(&mean.y).all(|(up, m)| up >= m));
    assert_eq!(overall.line.as_ref().unwrap().dash.as_deref(), Some("dash"));
    assert_eq!(overall.x, vec!["2000-01-01 00:00:00", "2000-01-02 00:00:00"]);
    assert_eq!(overall.y, vec![0.25, 0.25]);

    let annotation = &chart.layout.annotations[0];
    assert_eq!(annotation.text, "Mean: 25.0%");
    assert_eq!(annotation.yref, "y3");
    assert_eq!(annotation.x, "2000-01-01 06:15:00");

    let axis = chart.layout.yaxis("yaxis3").unwrap();
    assert_eq!(axis.range, Some([0.0, 0.5]));
    assert!(!axis.autorange);
    assert!(march.iter().all(|trace| !trace.showlegend && trace.hoverinfo == "name+x+text"));
}

#[test]
fn single_member_bucket_has_zero_width_band() {
    let chart = rate_chart(&[("2020-07-04 12:00", 0.5)]);
    let july: Vec<_> = chart.traces_on("y7").collect();
    assert_eq!(july[0].y, vec![1.0]);
    assert_eq!(july[1].y, vec![1.0]);
}

#[test]
fn raw_series_sorted_by_time_with_observed_axis() {
    let annotated = annotate(&[
        ("2020-05-02 18:00", 0.4),
        ("2020-05-01 03:00", 0.1),
        ("2020-05-03 09:30", 0.0),
    ]);
    let chart = ChartComposer::new(
        AggregationMode::RawSeries,
        AxisScaling::Observed,
        ChartOptions::default(),
    )
    .compose_raw(&annotated);

    assert_eq!(chart.data.len(), 1);
    let may = &chart.data[0];
    assert_eq!(may.yaxis, "y5");
    assert_eq!(may.mode, "lines+markers");
    assert_eq!(may.line.as_ref().unwrap().shape.as_deref(), Some("hv"));
    assert_eq!(may.y, vec![0.1, 0.0, 0.4]);
    assert_eq!(may.text, vec!["2020-05-01", "2020-05-03", "2020-05-02"]);
    assert_eq!(chart.layout.yaxis("yaxis5").unwrap().range, Some([0.0, 0.4]));
    assert!(chart.layout.yaxis("yaxis6").unwrap().autorange);
    assert!(chart.layout.annotations.is_empty());
}

#[test]
fn scatter_style_and_shared_legend() {
    let options = ChartOptions {
        raw_style: RawTraceStyle::Scatter,
        shared_legend: true,
        range_slider: false,
        ..ChartOptions::default()
    };
    let chart = ChartComposer::new(AggregationMode::RawSeries, AxisScaling::Observed, options)
        .compose_raw(&annotate(&[("2020-01-01 00:00", 0.3)]));
    assert_eq!(chart.data[0].mode, "markers");
    assert!(chart.data[0].line.is_none());
    assert!(chart.data[0].showlegend);
    assert!(chart.layout.showlegend);
    assert!(chart.layout.xaxis.rangeslider.is_none());
}

#[test]
fn mean_mode_keeps_negative_band_and_numeric_label() {
    let annotated = annotate(&[("2020-02-01 00:00", 0.0), ("2020-02-02 00:00", 0.1)]);
    let aggregates = MonthlyAggregator::new(AggregateField::Value, StdConvention::Sample)
        .aggregate(&annotated)
        .unwrap();
    let chart = ChartComposer::new(
        AggregationMode::MeanWithBand,
        AxisScaling::Observed,
        ChartOptions::default(),
    )
    .compose_aggregated(&aggregates);

    let february: Vec<_> = chart.traces_on("y2").collect();
    assert!(february[1].y[0] < 0.0);
    assert_eq!(chart.layout.annotations[0].text, "Mean: 0.050");
    let time = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
    assert_eq!(aggregates.get(2, time).unwrap().count, 2);
}

#[test]
fn snapshot_round_trips_through_json() {
    let chart = rate_chart(&[("2020-03-02 06:00", 0.2), ("2020-11-09 06:00", 0.0)]);
    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["layout"]["yaxis3"]["title"]["text"], "March");
    assert_eq!(json["layout"]["xaxis"]["type"], "date");
    assert_eq!(json["data"][0]["type"], "scatter");
    let restored: ChartSpec = serde_json::from_value(json).unwrap();
    assert_eq!(restored, chart);
}
