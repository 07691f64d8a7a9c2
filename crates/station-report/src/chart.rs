//! Twelve-panel diurnal chart.
//!
//! Every month owns one vertical axis stacked in calendar order from the
//! bottom (January) to the top (December). All panels share one horizontal
//! time-of-day axis: each time of day is placed on a fixed anchor date so
//! the axis renders as continuous time across a full day.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use station_model::{
    AggregateField, AggregationMode, Aggregates, AnnotatedObservation, AxisScaling, ChartOptions,
    MONTHS, MonthSeries, PipelineOptions, RawTraceStyle, month_name,
};
use tracing::debug;

use crate::figure::{
    Annotation, ChartSpec, Font, Layout, Legend, Line, Margin, Marker, RangeSlider, Title, Trace,
    XAxis, YAxis,
};
use crate::palette::{month_color, translucent};

/// Date every time of day is placed on.
pub const TIME_AXIS_ANCHOR: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HOVERINFO: &str = "name+x+text";
const LINE_WIDTH: f64 = 1.5;
const MARKER_SIZE: u32 = 8;
const BAND_OPACITY: f64 = 0.2;

fn time_axis_label(time: NaiveTime) -> String {
    TIME_AXIS_ANCHOR.and_time(time).format(TIMESTAMP_FORMAT).to_string()
}

fn day_end_label() -> String {
    let end: NaiveDateTime = TIME_AXIS_ANCHOR.and_time(NaiveTime::MIN) + TimeDelta::days(1);
    end.format(TIMESTAMP_FORMAT).to_string()
}

/// Trace reference for a month's axis: `y`, `y2`, ... `y12`.
fn axis_ref(month: u32) -> String {
    if month <= 1 {
        "y".to_string()
    } else {
        format!("y{month}")
    }
}

/// Layout key for a month's axis: `yaxis`, `yaxis2`, ... `yaxis12`.
fn axis_key(month: u32) -> String {
    if month <= 1 {
        "yaxis".to_string()
    } else {
        format!("yaxis{month}")
    }
}

/// Builds a [`ChartSpec`] from raw observations or aggregated buckets.
#[derive(Debug, Clone)]
pub struct ChartComposer {
    mode: AggregationMode,
    scaling: AxisScaling,
    options: ChartOptions,
}

impl ChartComposer {
    pub fn new(mode: AggregationMode, scaling: AxisScaling, options: ChartOptions) -> Self {
        Self {
            mode,
            scaling,
            options,
        }
    }

    pub fn from_options(options: &PipelineOptions) -> Self {
        Self::new(
            options.aggregation,
            options.axis_scaling(),
            options.chart.clone(),
        )
    }

    /// One trace per month of individual observations, sorted by time of day.
    pub fn compose_raw(&self, annotated: &[AnnotatedObservation]) -> ChartSpec {
        let mut by_month: BTreeMap<u32, Vec<&AnnotatedObservation>> = BTreeMap::new();
        for item in annotated {
            by_month.entry(item.month).or_default().push(item);
        }

        let mut data = Vec::new();
        let mut yaxes = BTreeMap::new();
        for month in MONTHS {
            let mut points = by_month.remove(&month).unwrap_or_default();
            points.sort_by_key(|item| item.time_of_day);
            let values: Vec<f64> = points.iter().map(|item| item.value()).collect();

            if !points.is_empty() {
                data.push(self.raw_trace(month, &points));
            }
            yaxes.insert(axis_key(month), self.y_axis(month, observed_range(&values)));
        }

        debug!(traces = data.len(), "raw chart composed");
        ChartSpec {
            data,
            layout: self.layout(yaxes, Vec::new()),
        }
    }

    /// Mean curve, one-sigma band and overall-mean line per month.
    pub fn compose_aggregated(&self, aggregates: &Aggregates) -> ChartSpec {
        let clip = self.mode.clips_band();
        let mut data = Vec::new();
        let mut yaxes = BTreeMap::new();
        let mut annotations = Vec::new();

        for series in aggregates.all_month_series() {
            let month = series.month;
            let mut extent: Vec<f64> = Vec::with_capacity(series.points.len() * 2);
            for point in &series.points {
                extent.push(point.stats.lower(clip));
                extent.push(point.stats.upper());
            }
            yaxes.insert(axis_key(month), self.y_axis(month, observed_range(&extent)));

            if series.is_empty() {
                continue;
            }
            data.extend(self.band_traces(&series, clip));
            data.push(self.mean_trace(&series));
            if let Some(overall) = series.overall_mean {
                data.push(self.overall_mean_trace(month, overall));
                annotations.extend(self.overall_mean_annotation(&series, aggregates.field, overall));
            }
        }

        debug!(
            traces = data.len(),
            annotations = annotations.len(),
            "aggregated chart composed"
        );
        ChartSpec {
            data,
            layout: self.layout(yaxes, annotations),
        }
    }

    fn raw_trace(&self, month: u32, points: &[&AnnotatedObservation]) -> Trace {
        let color = month_color(month);
        let (mode, line) = match self.options.raw_style {
            RawTraceStyle::LinesAndMarkers => (
                "lines+markers",
                Some(Line {
                    color: color.to_string(),
                    width: LINE_WIDTH,
                    shape: Some("hv".to_string()),
                    dash: None,
                }),
            ),
            RawTraceStyle::Scatter => ("markers", None),
        };
        Trace {
            mode: mode.to_string(),
            text: points
                .iter()
                .map(|item| item.timestamp().date_naive().to_string())
                .collect(),
            line,
            marker: Some(Marker {
                color: color.to_string(),
                size: MARKER_SIZE,
            }),
            ..self.base_trace(
                month,
                month_name(month).to_string(),
                points.iter().map(|item| item.time_of_day).collect(),
                points.iter().map(|item| item.value()).collect(),
                self.options.shared_legend,
            )
        }
    }

    /// Upper edge first, then the lower edge filled back up to it.
    fn band_traces(&self, series: &MonthSeries, clip: bool) -> [Trace; 2] {
        let month = series.month;
        let color = month_color(month);
        let times: Vec<NaiveTime> = series.points.iter().map(|p| p.time_of_day).collect();
        let edge = || {
            Some(Line {
                color: color.to_string(),
                width: 0.0,
                shape: None,
                dash: None,
            })
        };

        let upper = Trace {
            mode: "lines".to_string(),
            line: edge(),
            ..self.base_trace(
                month,
                format!("{} +1σ", month_name(month)),
                times.clone(),
                series.points.iter().map(|p| p.stats.upper()).collect(),
                false,
            )
        };
        let lower = Trace {
            mode: "lines".to_string(),
            line: edge(),
            fill: Some("tonexty".to_string()),
            fillcolor: Some(translucent(color, BAND_OPACITY)),
            ..self.base_trace(
                month,
                format!("{} -1σ", month_name(month)),
                times,
                series.points.iter().map(|p| p.stats.lower(clip)).collect(),
                false,
            )
        };
        [upper, lower]
    }

    fn mean_trace(&self, series: &MonthSeries) -> Trace {
        let month = series.month;
        let color = month_color(month);
        Trace {
            mode: "lines+markers".to_string(),
            text: series
                .points
                .iter()
                .map(|p| format!("n={}", p.stats.count))
                .collect(),
            line: Some(Line {
                color: color.to_string(),
                width: LINE_WIDTH,
                shape: None,
                dash: None,
            }),
            marker: Some(Marker {
                color: color.to_string(),
                size: MARKER_SIZE,
            }),
            ..self.base_trace(
                month,
                month_name(month).to_string(),
                series.points.iter().map(|p| p.time_of_day).collect(),
                series.points.iter().map(|p| p.stats.mean).collect(),
                self.options.shared_legend,
            )
        }
    }

    /// Dashed horizontal line across the whole day.
    fn overall_mean_trace(&self, month: u32, overall: f64) -> Trace {
        let mut trace = self.base_trace(
            month,
            format!("{} mean", month_name(month)),
            Vec::new(),
            vec![overall, overall],
            false,
        );
        trace.x = vec![time_axis_label(NaiveTime::MIN), day_end_label()];
        trace.mode = "lines".to_string();
        trace.line = Some(Line {
            color: month_color(month).to_string(),
            width: 1.0,
            shape: None,
            dash: Some("dash".to_string()),
        });
        trace
    }

    /// Label near the trailing end of the month's curve.
    fn overall_mean_annotation(
        &self,
        series: &MonthSeries,
        field: AggregateField,
        overall: f64,
    ) -> Option<Annotation> {
        let last = series.points.last()?;
        let text = match field {
            AggregateField::RainIndicator => format!("Mean: {:.1}%", overall * 100.0),
            AggregateField::Value => format!("Mean: {overall:.3}"),
        };
        Some(Annotation {
            x: time_axis_label(last.time_of_day),
            y: overall,
            xref: "x".to_string(),
            yref: axis_ref(series.month),
            text,
            showarrow: false,
            xanchor: "left".to_string(),
            yanchor: "bottom".to_string(),
            font: Font {
                color: month_color(series.month).to_string(),
            },
        })
    }

    fn base_trace(
        &self,
        month: u32,
        name: String,
        times: Vec<NaiveTime>,
        y: Vec<f64>,
        showlegend: bool,
    ) -> Trace {
        Trace {
            kind: "scatter".to_string(),
            name,
            x: times.into_iter().map(time_axis_label).collect(),
            y,
            yaxis: axis_ref(month),
            mode: "lines".to_string(),
            text: Vec::new(),
            hoverinfo: HOVERINFO.to_string(),
            showlegend,
            legendgroup: Some(month_name(month).to_string()),
            line: None,
            marker: None,
            fill: None,
            fillcolor: None,
        }
    }

    fn y_axis(&self, month: u32, observed: Option<[f64; 2]>) -> YAxis {
        let color = month_color(month).to_string();
        let band = 1.0 / MONTHS.len() as f64;
        let position = f64::from(month.saturating_sub(1));
        let range = match self.scaling {
            AxisScaling::Fixed { min, max } => Some([min, max]),
            AxisScaling::Observed => observed,
        };
        YAxis {
            kind: "linear".to_string(),
            anchor: "x".to_string(),
            domain: [band * position, band * (position + 1.0)],
            side: "right".to_string(),
            mirror: true,
            showline: true,
            zeroline: false,
            linecolor: color.clone(),
            tickfont: Font {
                color: color.clone(),
            },
            title: Title {
                text: month_name(month).to_string(),
                font: Some(Font { color }),
            },
            autorange: range.is_none(),
            range,
        }
    }

    fn layout(&self, yaxes: BTreeMap<String, YAxis>, annotations: Vec<Annotation>) -> Layout {
        let day = [time_axis_label(NaiveTime::MIN), day_end_label()];
        Layout {
            title: Title {
                text: self.options.title.clone(),
                font: None,
            },
            height: self.options.height,
            template: "plotly_white".to_string(),
            margin: Margin { t: 50, b: 50 },
            dragmode: "zoom".to_string(),
            hovermode: "closest".to_string(),
            showlegend: self.options.shared_legend,
            legend: Legend {
                traceorder: "reversed".to_string(),
            },
            xaxis: XAxis {
                kind: "date".to_string(),
                range: day.clone(),
                autorange: false,
                tickformat: "%H:%M".to_string(),
                rangeslider: self.options.range_slider.then(|| RangeSlider {
                    visible: true,
                    range: day,
                }),
            },
            annotations,
            yaxes,
        }
    }
}

/// `[min, max]` of finite values, `None` when empty or flat.
fn observed_range(values: &[f64]) -> Option<[f64; 2]> {
    let mut finite = values.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (min < max).then_some([min, max])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_names_follow_month_number() {
        assert_eq!(axis_ref(1), "y");
        assert_eq!(axis_ref(12), "y12");
        assert_eq!(axis_key(1), "yaxis");
        assert_eq!(axis_key(7), "yaxis7");
    }

    #[test]
    fn time_axis_spans_one_day() {
        assert_eq!(time_axis_label(NaiveTime::MIN), "2000-01-01 00:00:00");
        assert_eq!(day_end_label(), "2000-01-02 00:00:00");
    }

    #[test]
    fn observed_range_ignores_degenerate_input() {
        assert_eq!(observed_range(&[]), None);
        assert_eq!(observed_range(&[0.2, 0.2]), None);
        assert_eq!(observed_range(&[0.4, -0.1, f64::NAN, 0.3]), Some([-0.1, 0.4]));
    }
}
