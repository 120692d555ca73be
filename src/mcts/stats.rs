//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one search call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations started.
    pub iterations: u32,

    /// Nodes expanded (added to tree).
    pub nodes_expanded: u32,

    /// Expansions the oracle rejected; those iterations were skipped.
    pub expansions_rejected: u32,

    /// Rollouts performed.
    pub simulations: u32,

    /// The wall-clock budget ended the search before the iteration budget.
    pub timed_out: bool,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Share of iterations that ended in a rollout.
    #[must_use]
    pub fn simulation_ratio(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.simulations as f64 / self.iterations as f64
        }
    }
}
