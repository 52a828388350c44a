//! Selection policies.
//!
//! `SelectionPolicy` decides which child the Selection phase descends
//! into. It only scores children during search; the move recommended once
//! search is over comes from [`MCTSTree::best_child`](super::MCTSTree::best_child).

use super::config::MCTSConfig;

/// Policy for scoring a child during Selection.
pub trait SelectionPolicy: Send + Sync {
    /// Score a child given its statistics and its parent's visit count.
    ///
    /// The child with the highest score is followed.
    fn score(
        &self,
        parent_visits: u32,
        child_visits: u32,
        child_total: f64,
        config: &MCTSConfig,
    ) -> f64;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (high reward) with exploration (low visits).
/// Formula: Q(a) + c * sqrt(ln(N) / n(a)), with unvisited children scored
/// `+inf` so every child is tried once before any is revisited.
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn score(
        &self,
        parent_visits: u32,
        child_visits: u32,
        child_total: f64,
        config: &MCTSConfig,
    ) -> f64 {
        if child_visits == 0 {
            return f64::INFINITY;
        }

        let n = child_visits as f64;
        let ln_parent = (parent_visits.max(1) as f64).ln();
        child_total / n + config.exploration_constant * (ln_parent / n).sqrt()
    }
}

/// Pure exploitation: follow the best average, trying unvisited children first.
#[derive(Clone, Debug, Default)]
pub struct Greedy;

impl SelectionPolicy for Greedy {
    fn score(
        &self,
        _parent_visits: u32,
        child_visits: u32,
        child_total: f64,
        _config: &MCTSConfig,
    ) -> f64 {
        if child_visits == 0 {
            f64::INFINITY
        } else {
            child_total / child_visits as f64
        }
    }
}
