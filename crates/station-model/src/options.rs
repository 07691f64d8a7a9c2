//! Run configuration for the station pipeline.
//!
//! Every knob has a documented default so the pipeline never reads
//! process-wide state. The CLI builds a [`PipelineOptions`] from its flags;
//! tests build one directly with alternate values.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{OptionsError, Result};
use crate::timezone::DEFAULT_TIMEZONE;

/// Default rain threshold, in inches.
pub const DEFAULT_RAIN_THRESHOLD: f64 = 0.01;

/// Codes the station exports use for missing or erroneous readings.
pub const DEFAULT_SENTINELS: [f64; 3] = [999.99, -9999.99, -9999.00];

pub const DEFAULT_DATE_COLUMN: &str = "DATE";
pub const DEFAULT_VALUE_COLUMN: &str = "QPCP";

/// Substring marking per-window value columns in wide exports (`0015Val`).
pub const DEFAULT_VALUE_MARKER: &str = "Val";

pub const DEFAULT_OUTPUT_BASE: &str = "out";
pub const DEFAULT_STATION: &str = "SEATTLE SAND POINT WEATHER FORECAST OFFICE WA US";
pub const DEFAULT_CHART_TITLE: &str = "Precipitation by time of day";
pub const DEFAULT_CHART_HEIGHT: u32 = 2000;

/// Lower and upper bound used by probability-style panels.
pub const PROBABILITY_AXIS: (f64, f64) = (0.0, 0.5);

/// How a measurement is turned into the `rained` flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RainRule {
    /// `value >= threshold`
    AtLeast(f64),
    /// `value > threshold`
    GreaterThan(f64),
}

impl Default for RainRule {
    fn default() -> Self {
        Self::AtLeast(DEFAULT_RAIN_THRESHOLD)
    }
}

impl RainRule {
    pub fn threshold(self) -> f64 {
        match self {
            Self::AtLeast(threshold) | Self::GreaterThan(threshold) => threshold,
        }
    }

    pub fn rained(self, value: f64) -> bool {
        match self {
            Self::AtLeast(threshold) => value >= threshold,
            Self::GreaterThan(threshold) => value > threshold,
        }
    }
}

/// Standard deviation convention applied to every bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StdConvention {
    /// Divide by `n - 1`.
    #[default]
    Sample,
    /// Divide by `n`.
    Population,
}

impl StdConvention {
    /// Delta degrees of freedom.
    pub fn ddof(self) -> u8 {
        match self {
            Self::Sample => 1,
            Self::Population => 0,
        }
    }
}

/// Field summarized by the monthly aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateField {
    /// The 0/1 rained indicator; bucket means are empirical probabilities.
    RainIndicator,
    /// The measurement itself.
    Value,
}

/// What the chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Individual observations, no aggregation.
    RawSeries,
    /// Probability of rain per bucket with a one-sigma band.
    #[default]
    RateWithBand,
    /// Mean measurement per bucket with a one-sigma band.
    MeanWithBand,
}

impl AggregationMode {
    /// Aggregated field, `None` when the mode plots raw observations.
    pub fn field(self) -> Option<AggregateField> {
        match self {
            Self::RawSeries => None,
            Self::RateWithBand => Some(AggregateField::RainIndicator),
            Self::MeanWithBand => Some(AggregateField::Value),
        }
    }

    pub fn default_axis_scaling(self) -> AxisScaling {
        match self {
            Self::RateWithBand => AxisScaling::Fixed {
                min: PROBABILITY_AXIS.0,
                max: PROBABILITY_AXIS.1,
            },
            Self::RawSeries | Self::MeanWithBand => AxisScaling::Observed,
        }
    }

    /// Rates cannot be negative, so their band is clipped at zero.
    pub fn clips_band(self) -> bool {
        matches!(self, Self::RateWithBand)
    }
}

/// Vertical scaling of each panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisScaling {
    /// Scale to the plotted data's min/max.
    Observed,
    /// Fixed domain shared by all panels.
    Fixed { min: f64, max: f64 },
}

impl AxisScaling {
    pub fn fixed(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(OptionsError::InvalidAxisRange { min, max });
        }
        Ok(Self::Fixed { min, max })
    }
}

/// Trace style for raw-series charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RawTraceStyle {
    #[default]
    LinesAndMarkers,
    Scatter,
}

/// Closed set of sentinel codes.
#[derive(Debug, Clone, PartialEq)]
pub struct SentinelSet {
    values: Vec<f64>,
}

impl Default for SentinelSet {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINELS)
    }
}

impl SentinelSet {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let mut values: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        Self { values }
    }

    /// An empty set; nothing is filtered.
    pub fn empty() -> Self {
        Self { values: Vec::new() }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.values.iter().any(|sentinel| *sentinel == value)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Column naming conventions of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOptions {
    pub date_column: String,
    /// Value column of narrow exports.
    pub value_column: String,
    /// Marker identifying wide value columns.
    pub value_marker: String,
    pub delimiter: u8,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            value_marker: DEFAULT_VALUE_MARKER.to_string(),
            delimiter: b',',
        }
    }
}

/// Chart presentation options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub height: u32,
    /// Show the range-selector strip under the time axis.
    pub range_slider: bool,
    /// Show one legend entry per month instead of suppressing legends.
    pub shared_legend: bool,
    pub raw_style: RawTraceStyle,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_CHART_TITLE.to_string(),
            height: DEFAULT_CHART_HEIGHT,
            range_slider: true,
            shared_legend: false,
            raw_style: RawTraceStyle::default(),
        }
    }
}

/// Output naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Base path; extensions are appended, never substituted.
    pub base_name: PathBuf,
    /// Also write the structured JSON snapshot.
    pub snapshot: bool,
    /// Local plotly.js bundle inlined into the page; `None` links the CDN.
    pub plotly_js: Option<PathBuf>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            base_name: PathBuf::from(DEFAULT_OUTPUT_BASE),
            snapshot: false,
            plotly_js: None,
        }
    }
}

impl OutputOptions {
    pub fn html_path(&self) -> PathBuf {
        with_appended_extension(&self.base_name, "html")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        with_appended_extension(&self.base_name, "json")
    }
}

fn with_appended_extension(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Options for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Zone every parsed instant is localized to.
    pub timezone: Tz,
    /// Anchor date for time-only strings. `None` means today in `timezone`.
    pub reference_date: Option<NaiveDate>,
    pub columns: ColumnOptions,
    pub sentinels: SentinelSet,
    pub rain_rule: RainRule,
    pub std_convention: StdConvention,
    pub aggregation: AggregationMode,
    /// Overrides the mode's default scaling when set.
    pub axis_scaling: Option<AxisScaling>,
    pub chart: ChartOptions,
    pub output: OutputOptions,
    /// Advisory only; logged, never applied.
    pub station_filter: Option<String>,
    /// Advisory only; validated and logged, never applied.
    pub start_date: Option<String>,
    /// Advisory only; validated and logged, never applied.
    pub end_date: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            reference_date: None,
            columns: ColumnOptions::default(),
            sentinels: SentinelSet::default(),
            rain_rule: RainRule::default(),
            std_convention: StdConvention::default(),
            aggregation: AggregationMode::default(),
            axis_scaling: None,
            chart: ChartOptions::default(),
            output: OutputOptions::default(),
            station_filter: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective vertical scaling for this run.
    pub fn axis_scaling(&self) -> AxisScaling {
        self.axis_scaling
            .unwrap_or_else(|| self.aggregation.default_axis_scaling())
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_rain_rule(mut self, rule: RainRule) -> Self {
        self.rain_rule = rule;
        self
    }

    #[must_use]
    pub fn with_sentinels(mut self, sentinels: SentinelSet) -> Self {
        self.sentinels = sentinels;
        self
    }

    #[must_use]
    pub fn with_aggregation(mut self, mode: AggregationMode) -> Self {
        self.aggregation = mode;
        self
    }

    #[must_use]
    pub fn with_axis_scaling(mut self, scaling: AxisScaling) -> Self {
        self.axis_scaling = Some(scaling);
        self
    }

    #[must_use]
    pub fn with_std_convention(mut self, convention: StdConvention) -> Self {
        self.std_convention = convention;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }
}

/// Validate a user-supplied rain threshold.
pub fn validate_threshold(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(OptionsError::InvalidThreshold { value })
    }
}
