use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use comfy_table::Table;
use station_model::{
    AggregationMode, AxisScaling, ChartOptions, ColumnOptions, OutputOptions, PipelineOptions,
    RainRule, RawTraceStyle, SentinelSet, StdConvention, resolve_timezone, validate_threshold,
};
use station_transform::{PATTERNS, PatternKind};
use tracing::info_span;

use crate::cli::{ModeArg, PlotArgs, RainRuleArg, RawStyleArg, StdArg};
use crate::summary::apply_table_style;
use station_cli::pipeline::run_pipeline;
use station_cli::types::PlotResult;

/// Sample instant rendered in every encoding by `formats`.
const SAMPLE_STAMP: (i32, u32, u32, u32, u32) = (2021, 3, 14, 6, 45);

pub fn run_formats() -> Result<()> {
    let (year, month, day, hour, minute) = SAMPLE_STAMP;
    let sample = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .context("sample timestamp")?;
    let mut table = Table::new();
    table.set_header(vec!["Order", "Name", "Format", "Yields", "Example"]);
    apply_table_style(&mut table);
    for (index, pattern) in PATTERNS.iter().enumerate() {
        let yields = match pattern.kind {
            PatternKind::DateTime => "date and time",
            PatternKind::Date => "date (midnight)",
            PatternKind::TimeOnly => "time (reference date)",
        };
        table.add_row(vec![
            (index + 1).to_string(),
            pattern.name.to_string(),
            pattern.format.to_string(),
            yields.to_string(),
            pattern.render(sample),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_plot(args: &PlotArgs) -> Result<PlotResult> {
    let options = {
        let _span = info_span!("options").entered();
        pipeline_options(args)?
    };
    run_pipeline(&args.datafile, &options, args.dry_run)
}

/// Translate command-line flags into pipeline options, rejecting invalid
/// combinations before any file is touched.
pub fn pipeline_options(args: &PlotArgs) -> Result<PipelineOptions> {
    let timezone = resolve_timezone(&args.timezone).context("--timezone")?;
    let reference_date = args
        .reference_date
        .as_deref()
        .map(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d"))
        .transpose()
        .context("--reference-date expects YYYY-MM-DD")?;

    let threshold = validate_threshold(args.rain_threshold).context("--rain-threshold")?;
    let rain_rule = match args.rain_rule {
        RainRuleArg::AtLeast => RainRule::AtLeast(threshold),
        RainRuleArg::GreaterThan => RainRule::GreaterThan(threshold),
    };

    let axis_scaling = match (args.axis_min, args.axis_max) {
        (Some(min), Some(max)) => {
            Some(AxisScaling::fixed(min, max).context("--axis-min/--axis-max")?)
        }
        (None, None) if args.observed_axis => Some(AxisScaling::Observed),
        (None, None) => None,
        _ => bail!("--axis-min and --axis-max must be given together"),
    };

    let sentinels = if args.no_sentinels {
        SentinelSet::empty()
    } else if args.sentinels.is_empty() {
        SentinelSet::default()
    } else {
        SentinelSet::new(args.sentinels.iter().copied())
    };

    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| {
            format!(
                "--delimiter must be a single ASCII character, got {:?}",
                args.delimiter
            )
        })?;

    let mut options = PipelineOptions::new()
        .with_timezone(timezone)
        .with_rain_rule(rain_rule)
        .with_sentinels(sentinels)
        .with_std_convention(match args.std {
            StdArg::Sample => StdConvention::Sample,
            StdArg::Population => StdConvention::Population,
        })
        .with_aggregation(match args.mode {
            ModeArg::Raw => AggregationMode::RawSeries,
            ModeArg::Rate => AggregationMode::RateWithBand,
            ModeArg::Mean => AggregationMode::MeanWithBand,
        })
        .with_output(OutputOptions {
            base_name: args.output.clone(),
            snapshot: args.snapshot,
            plotly_js: args.plotly_js.clone(),
        });
    if let Some(date) = reference_date {
        options = options.with_reference_date(date);
    }
    if let Some(scaling) = axis_scaling {
        options = options.with_axis_scaling(scaling);
    }
    options.columns = ColumnOptions {
        date_column: args.date_column.clone(),
        value_column: args.value_column.clone(),
        value_marker: args.value_marker.clone(),
        delimiter,
    };
    options.chart = ChartOptions {
        title: args.title.clone(),
        height: args.height,
        range_slider: !args.no_range_slider,
        shared_legend: args.shared_legend,
        raw_style: match args.raw_style {
            RawStyleArg::Lines => RawTraceStyle::LinesAndMarkers,
            RawStyleArg::Scatter => RawTraceStyle::Scatter,
        },
    };
    options.station_filter = Some(args.station.clone());
    options.start_date.clone_from(&args.start_date);
    options.end_date.clone_from(&args.end_date);
    Ok(options)
}
