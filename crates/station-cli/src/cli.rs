//! CLI argument definitions for the station plotter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use station_model::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_TITLE, DEFAULT_DATE_COLUMN, DEFAULT_OUTPUT_BASE,
    DEFAULT_RAIN_THRESHOLD, DEFAULT_STATION, DEFAULT_VALUE_COLUMN, DEFAULT_VALUE_MARKER,
};

#[derive(Parser)]
#[command(
    name = "station-plotter",
    version,
    about = "Plot per-month time-of-day precipitation patterns from weather-station exports",
    long_about = "Load a weather-station export, drop sentinel readings, and render a \
                  twelve-panel interactive chart comparing months on a shared \
                  time-of-day axis.\n\n\
                  Supports narrow exports (one timestamp and value per row) and wide \
                  exports (one value column per time window, e.g. 0015Val)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix every log line with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a station export and write the monthly chart.
    Plot(Box<PlotArgs>),

    /// List the accepted date/time encodings in match order.
    Formats,
}

#[derive(Parser)]
pub struct PlotArgs {
    /// Station export to read.
    #[arg(long = "datafile", value_name = "PATH")]
    pub datafile: PathBuf,

    /// Station name (logged only).
    #[arg(long = "station", default_value = DEFAULT_STATION)]
    pub station: String,

    /// Start of the period of interest (logged only).
    #[arg(long = "start-date", value_name = "DATE")]
    pub start_date: Option<String>,

    /// End of the period of interest (logged only).
    #[arg(long = "end-date", value_name = "DATE")]
    pub end_date: Option<String>,

    /// What to plot.
    #[arg(long = "mode", value_enum, default_value = "rate")]
    pub mode: ModeArg,

    /// Measurement at which a reading counts as rain.
    #[arg(long = "rain-threshold", default_value_t = DEFAULT_RAIN_THRESHOLD)]
    pub rain_threshold: f64,

    /// Comparison applied against the rain threshold.
    #[arg(long = "rain-rule", value_enum, default_value = "at-least")]
    pub rain_rule: RainRuleArg,

    /// Standard deviation convention for bucket bands.
    #[arg(long = "std", value_enum, default_value = "sample")]
    pub std: StdArg,

    /// Fixed lower bound of every panel (requires --axis-max).
    #[arg(long = "axis-min", requires = "axis_max", allow_negative_numbers = true)]
    pub axis_min: Option<f64>,

    /// Fixed upper bound of every panel (requires --axis-min).
    #[arg(long = "axis-max", requires = "axis_min", allow_negative_numbers = true)]
    pub axis_max: Option<f64>,

    /// Scale each panel to its own data, even in rate mode.
    #[arg(long = "observed-axis", conflicts_with_all = ["axis_min", "axis_max"])]
    pub observed_axis: bool,

    /// Zone for all timestamps (IANA name or alias such as PST).
    #[arg(long = "timezone", default_value = "America/Los_Angeles")]
    pub timezone: String,

    /// Date that time-only values are anchored to (default: today).
    #[arg(long = "reference-date", value_name = "YYYY-MM-DD")]
    pub reference_date: Option<String>,

    /// Sentinel code marking a missing reading; repeat to replace the defaults.
    #[arg(long = "sentinel", value_name = "VALUE", allow_negative_numbers = true)]
    pub sentinels: Vec<f64>,

    /// Keep every reading, including sentinel codes.
    #[arg(long = "no-sentinels", conflicts_with = "sentinels")]
    pub no_sentinels: bool,

    /// Name of the date column.
    #[arg(long = "date-column", default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    /// Name of the value column in narrow exports.
    #[arg(long = "value-column", default_value = DEFAULT_VALUE_COLUMN)]
    pub value_column: String,

    /// Marker identifying per-window value columns in wide exports.
    #[arg(long = "value-marker", default_value = DEFAULT_VALUE_MARKER)]
    pub value_marker: String,

    /// Field delimiter of the export.
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,

    /// Chart title.
    #[arg(long = "title", default_value = DEFAULT_CHART_TITLE)]
    pub title: String,

    /// Chart height in pixels.
    #[arg(long = "height", default_value_t = DEFAULT_CHART_HEIGHT)]
    pub height: u32,

    /// Hide the range selector under the time axis.
    #[arg(long = "no-range-slider")]
    pub no_range_slider: bool,

    /// Show one legend entry per month.
    #[arg(long = "shared-legend")]
    pub shared_legend: bool,

    /// Trace style for --mode raw.
    #[arg(long = "raw-style", value_enum, default_value = "lines")]
    pub raw_style: RawStyleArg,

    /// Output base name; .html (and .json) are appended.
    #[arg(long = "output", value_name = "BASE", default_value = DEFAULT_OUTPUT_BASE)]
    pub output: PathBuf,

    /// Also write the chart as a JSON snapshot.
    #[arg(long = "snapshot")]
    pub snapshot: bool,

    /// Inline this local plotly.js bundle so the chart works offline.
    #[arg(long = "plotly-js", value_name = "PATH")]
    pub plotly_js: Option<PathBuf>,

    /// Run every stage but do not write any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Individual observations.
    Raw,
    /// Probability of rain with a one-sigma band.
    Rate,
    /// Mean measurement with a one-sigma band.
    Mean,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RainRuleArg {
    AtLeast,
    GreaterThan,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StdArg {
    Sample,
    Population,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RawStyleArg {
    Lines,
    Scatter,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
