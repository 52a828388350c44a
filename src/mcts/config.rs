//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::error::{MctsError, Result};

/// MCTS configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Random playouts run from each newly expanded node.
    pub rollouts: u32,

    /// Rollout count above which a node's playouts are split across threads.
    /// Up to and including it they run on the stepping thread.
    pub parallel_threshold: u32,

    /// Threads used for one node's playouts once the threshold is exceeded.
    pub rollout_threads: usize,

    /// Maximum nodes to allocate in the tree.
    /// Steps stop expanding once the arena is this large.
    pub max_nodes: usize,

    /// Seed for choosing which untried move to expand next.
    pub seed: u64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            rollouts: 1,
            parallel_threshold: 64,
            rollout_threads: 4,
            max_nodes: 1_000_000,
            seed: 42,
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with a custom rollout count per expansion.
    pub fn with_rollouts(mut self, rollouts: u32) -> Self {
        self.rollouts = rollouts;
        self
    }

    /// Create a new config with custom parallel rollout settings.
    pub fn with_parallel_rollouts(mut self, threshold: u32, threads: usize) -> Self {
        self.parallel_threshold = threshold;
        self.rollout_threads = threads;
        self
    }

    /// Create a new config with a custom node limit.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether a node's playouts should be split across threads.
    #[must_use]
    pub fn parallel_rollouts(&self) -> bool {
        self.rollout_threads > 1 && self.rollouts > self.parallel_threshold
    }

    /// Reject settings the search cannot run with.
    ///
    /// Visit counts are `u32`, and the root collects `rollouts` visits for
    /// every node below it, so `rollouts * max_nodes` must fit in a `u32`.
    pub fn validate(&self) -> Result<()> {
        if self.rollouts == 0 {
            return Err(MctsError::InvalidConfiguration {
                message: "rollouts must be at least 1".into(),
            });
        }
        if self.rollout_threads == 0 {
            return Err(MctsError::InvalidConfiguration {
                message: "rollout_threads must be at least 1".into(),
            });
        }
        if self.max_nodes == 0 {
            return Err(MctsError::InvalidConfiguration {
                message: "max_nodes must be at least 1".into(),
            });
        }
        let max_visits = u64::from(self.rollouts).saturating_mul(self.max_nodes as u64);
        if max_visits > u64::from(u32::MAX) {
            return Err(MctsError::InvalidConfiguration {
                message: format!(
                    "rollouts ({}) * max_nodes ({}) overflows the u32 visit count",
                    self.rollouts, self.max_nodes
                ),
            });
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MctsError::InvalidConfiguration {
                message: format!(
                    "exploration_constant {} must be finite and non-negative",
                    self.exploration_constant
                ),
            });
        }
        Ok(())
    }
}
