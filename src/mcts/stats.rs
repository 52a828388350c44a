//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during MCTS search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Completed `step` calls that changed the tree.
    pub steps: u64,

    /// Nodes expanded (added to tree).
    pub nodes_expanded: u64,

    /// Expansions that reached a terminal position, needing no playout.
    pub terminal_expansions: u64,

    /// Playouts (rollouts) performed.
    pub simulations: u64,

    /// Rollout batches split across threads.
    pub parallel_batches: u64,

    /// Maximum depth reached during search.
    pub max_depth: u32,

    /// Time spent inside `step` (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate steps per second.
    #[must_use]
    pub fn steps_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.steps as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Calculate simulations per second.
    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.simulations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}
