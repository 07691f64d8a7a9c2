//! Station plotting pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Load**: read the source and reshape it into observations
//! 2. **Filter**: drop sentinel-coded readings
//! 3. **Annotate**: derive rained flag, time of day and month
//! 4. **Aggregate**: per (month, time-of-day) statistics (aggregated modes)
//! 5. **Compose**: build the twelve-panel chart
//! 6. **Write**: persist the HTML document and optional snapshot
//!
//! Each stage fully consumes its input and returns a fresh collection.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use station_ingest::{LoadedSource, RecordLoader};
use station_model::{Aggregates, AnnotatedObservation, MONTHS, Observation, PipelineOptions};
use station_report::{ArtifactPaths, ArtifactWriter, ChartComposer, ChartSpec};
use station_transform::{
    DatetimeNormalizer, DerivedFieldComputer, MonthlyAggregator, SentinelFilter,
};
use tracing::{info, info_span, warn};

use crate::types::{MonthSummary, PlotResult};

// ============================================================================
// Stage 0: Advisory settings
// ============================================================================

/// Parse the advisory date bounds and log them with the station filter.
/// Neither is applied to the data.
pub fn check_advisory(options: &PipelineOptions, normalizer: &DatetimeNormalizer) -> Result<()> {
    let start = options
        .start_date
        .as_deref()
        .map(|value| normalizer.parse_dated(value))
        .transpose()
        .context("invalid start date")?;
    let end = options
        .end_date
        .as_deref()
        .map(|value| normalizer.parse_dated(value))
        .transpose()
        .context("invalid end date")?;

    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        warn!(%start, %end, "start date is after end date");
    }
    info!(
        station = options.station_filter.as_deref().unwrap_or("-"),
        start = ?start.map(|value| value.to_rfc3339()),
        end = ?end.map(|value| value.to_rfc3339()),
        "advisory bounds (not applied)"
    );
    Ok(())
}

// ============================================================================
// Stage 1: Load
// ============================================================================

pub fn load(
    source: &Path,
    options: &PipelineOptions,
    normalizer: DatetimeNormalizer,
) -> Result<LoadedSource> {
    let start = Instant::now();
    let loader = RecordLoader::new(normalizer, options.columns.clone());
    let loaded = loader
        .load_path(source)
        .with_context(|| format!("load {}", source.display()))?;
    info!(
        layout = loaded.layout.name(),
        rows = loaded.rows,
        observations = loaded.observations.len(),
        duration_ms = start.elapsed().as_millis(),
        "load complete"
    );
    Ok(loaded)
}

// ============================================================================
// Stage 2: Filter
// ============================================================================

pub fn filter(observations: &[Observation], options: &PipelineOptions) -> Vec<Observation> {
    let start = Instant::now();
    let kept = SentinelFilter::new(options.sentinels.clone()).filter(observations);
    info!(
        kept = kept.len(),
        removed = observations.len() - kept.len(),
        duration_ms = start.elapsed().as_millis(),
        "filter complete"
    );
    kept
}

// ============================================================================
// Stage 3: Annotate
// ============================================================================

pub fn annotate(
    observations: &[Observation],
    options: &PipelineOptions,
) -> Vec<AnnotatedObservation> {
    let start = Instant::now();
    let annotated = DerivedFieldComputer::new(options.rain_rule).annotate(observations);
    info!(
        observations = annotated.len(),
        rained = annotated.iter().filter(|item| item.rained).count(),
        threshold = options.rain_rule.threshold(),
        duration_ms = start.elapsed().as_millis(),
        "annotate complete"
    );
    annotated
}

// ============================================================================
// Stage 4: Aggregate
// ============================================================================

/// `None` for raw-series runs.
pub fn aggregate(
    annotated: &[AnnotatedObservation],
    options: &PipelineOptions,
) -> Result<Option<Aggregates>> {
    let Some(field) = options.aggregation.field() else {
        return Ok(None);
    };
    let start = Instant::now();
    let aggregates = MonthlyAggregator::new(field, options.std_convention)
        .aggregate(annotated)
        .context("aggregate observations")?;
    info!(
        buckets = aggregates.len(),
        field = ?field,
        duration_ms = start.elapsed().as_millis(),
        "aggregate complete"
    );
    Ok(Some(aggregates))
}

// ============================================================================
// Stage 5: Compose
// ============================================================================

pub fn compose(
    annotated: &[AnnotatedObservation],
    aggregates: Option<&Aggregates>,
    options: &PipelineOptions,
) -> ChartSpec {
    let start = Instant::now();
    let composer = ChartComposer::from_options(options);
    let chart = match aggregates {
        Some(aggregates) => composer.compose_aggregated(aggregates),
        None => composer.compose_raw(annotated),
    };
    info!(
        traces = chart.data.len(),
        axes = chart.layout.yaxes.len(),
        duration_ms = start.elapsed().as_millis(),
        "compose complete"
    );
    chart
}

// ============================================================================
// Stage 6: Write
// ============================================================================

pub fn write(chart: &ChartSpec, options: &PipelineOptions) -> Result<ArtifactPaths> {
    let start = Instant::now();
    let paths = ArtifactWriter::new(options.output.clone())
        .write(chart)
        .context("write artifacts")?;
    info!(
        html = %paths.html.display(),
        snapshot = ?paths.snapshot,
        duration_ms = start.elapsed().as_millis(),
        "write complete"
    );
    Ok(paths)
}

// ============================================================================
// Full run
// ============================================================================

/// Run every stage; the write stage is skipped when `dry_run` is set.
pub fn run_pipeline(
    source: &Path,
    options: &PipelineOptions,
    dry_run: bool,
) -> Result<PlotResult> {
    let run_span = info_span!("plot", source = %source.display(), mode = ?options.aggregation);
    let _run_guard = run_span.enter();
    let normalizer = DatetimeNormalizer::from_options(options);

    info_span!("advisory").in_scope(|| check_advisory(options, &normalizer))?;
    let loaded = info_span!("load").in_scope(|| load(source, options, normalizer))?;
    let filtered = info_span!("filter").in_scope(|| filter(&loaded.observations, options));
    let annotated = info_span!("annotate").in_scope(|| annotate(&filtered, options));
    let aggregates = info_span!("aggregate").in_scope(|| aggregate(&annotated, options))?;
    let chart =
        info_span!("compose").in_scope(|| compose(&annotated, aggregates.as_ref(), options));

    let artifacts = if dry_run {
        info!("dry run, skipping write");
        None
    } else {
        Some(info_span!("write").in_scope(|| write(&chart, options))?)
    };

    Ok(PlotResult {
        source: source.to_path_buf(),
        layout: loaded.layout.name(),
        mode: options.aggregation,
        rows: loaded.rows,
        loaded: loaded.observations.len(),
        sentinels_removed: loaded.observations.len() - filtered.len(),
        months: month_summaries(&annotated, aggregates.as_ref()),
        artifacts,
    })
}

/// Per-month counts for the run summary, calendar order.
pub fn month_summaries(
    annotated: &[AnnotatedObservation],
    aggregates: Option<&Aggregates>,
) -> Vec<MonthSummary> {
    MONTHS
        .iter()
        .map(|&month| {
            let observations = annotated.iter().filter(|item| item.month == month).count();
            let series = aggregates.map(|aggregates| aggregates.month_series(month));
            MonthSummary {
                month,
                observations,
                buckets: series.as_ref().map(|series| series.points.len()),
                overall_mean: series.and_then(|series| series.overall_mean),
            }
        })
        .collect()
}
