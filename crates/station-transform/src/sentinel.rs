//! Removal of sentinel-coded readings.

use station_model::{Observation, SentinelSet};
use tracing::debug;

/// Drops observations whose value is a sentinel code.
#[derive(Debug, Clone, Default)]
pub struct SentinelFilter {
    sentinels: SentinelSet,
}

impl SentinelFilter {
    pub fn new(sentinels: SentinelSet) -> Self {
        Self { sentinels }
    }

    pub fn sentinels(&self) -> &SentinelSet {
        &self.sentinels
    }

    /// Order-preserving; the input is left untouched.
    pub fn filter(&self, observations: &[Observation]) -> Vec<Observation> {
        let kept: Vec<Observation> = observations
            .iter()
            .filter(|observation| !self.sentinels.contains(observation.value))
            .copied()
            .collect();
        let removed = observations.len() - kept.len();
        if removed > 0 {
            debug!(removed, kept = kept.len(), "sentinel readings removed");
        }
        kept
    }
}
