use std::path::PathBuf;

use station_model::AggregationMode;
use station_report::ArtifactPaths;

/// Outcome of one plot run, consumed by the summary printer.
#[derive(Debug)]
pub struct PlotResult {
    pub source: PathBuf,
    pub layout: &'static str,
    pub mode: AggregationMode,
    pub rows: usize,
    pub loaded: usize,
    pub sentinels_removed: usize,
    pub months: Vec<MonthSummary>,
    /// `None` for dry runs.
    pub artifacts: Option<ArtifactPaths>,
}

impl PlotResult {
    pub fn observations(&self) -> usize {
        self.loaded - self.sentinels_removed
    }

    pub fn total_buckets(&self) -> Option<usize> {
        self.months
            .iter()
            .map(|month| month.buckets)
            .sum::<Option<usize>>()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: u32,
    pub observations: usize,
    /// Populated for aggregated modes only.
    pub buckets: Option<usize>,
    pub overall_mean: Option<f64>,
}
