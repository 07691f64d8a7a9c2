//! Per-observation derived fields.

use chrono::{Datelike, Timelike};
use station_model::{AnnotatedObservation, Observation, RainRule};

/// Adds `rained`, `time_of_day` and `month` to each observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedFieldComputer {
    rule: RainRule,
}

impl DerivedFieldComputer {
    pub fn new(rule: RainRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> RainRule {
        self.rule
    }

    pub fn annotate(&self, observations: &[Observation]) -> Vec<AnnotatedObservation> {
        observations
            .iter()
            .map(|observation| self.annotate_one(*observation))
            .collect()
    }

    /// Time of day and month come from the recorded wall clock.
    pub fn annotate_one(&self, observation: Observation) -> AnnotatedObservation {
        let wall_time = observation.wall_clock.time();
        AnnotatedObservation {
            observation,
            time_of_day: wall_time.with_nanosecond(0).unwrap_or(wall_time),
            rained: self.rule.rained(observation.value),
            month: observation.wall_clock.month(),
        }
    }
}
