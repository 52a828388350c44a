//! Rollout tallies and the shared aggregator used for parallel playouts.
//!
//! A node's rollout quota can be filled by one thread or raced by several.
//! In the parallel case every thread plays out its own copy of the state
//! with its own [`RandomSource`] generator, and the only shared write is
//! the aggregator's locked tally.

use std::sync::{Mutex, MutexGuard};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{PlayerId, PlayerMap, RandomSource};
use crate::error::{MctsError, Result};
use crate::rules::{GameResult, GameState};

use super::config::MCTSConfig;

/// Outcome counts from a batch of playouts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloutTally {
    /// Playouts recorded.
    pub plays: u32,

    /// Playouts that ended in a draw.
    pub draws: u32,

    /// Playouts won, per player.
    pub wins: PlayerMap<u32>,
}

impl RolloutTally {
    /// Empty tally.
    #[must_use]
    pub fn new(player_count: u8) -> Self {
        Self {
            plays: 0,
            draws: 0,
            wins: PlayerMap::with_value(player_count, 0),
        }
    }

    /// Tally of a single outcome.
    #[must_use]
    pub fn from_result(result: &GameResult, player_count: u8) -> Self {
        let mut tally = Self::new(player_count);
        tally.record(result);
        tally
    }

    /// Count one playout.
    pub fn record(&mut self, result: &GameResult) {
        self.plays += 1;
        match result {
            GameResult::Winner(player) => self.wins[*player] += 1,
            GameResult::Draw => self.draws += 1,
        }
    }

    /// Summed reward for `player`: 1 per win, 0.5 per draw.
    #[must_use]
    pub fn reward_for(&self, player: PlayerId) -> f64 {
        self.wins[player] as f64 * GameResult::WIN + self.draws as f64 * GameResult::DRAW
    }
}

/// Shared tally that several threads race to fill up to a fixed target.
#[derive(Debug)]
pub struct RolloutAggregator {
    target: u32,
    tally: Mutex<RolloutTally>,
}

impl RolloutAggregator {
    /// Aggregator accepting exactly `target` results.
    #[must_use]
    pub fn new(target: u32, player_count: u8) -> Self {
        Self {
            target,
            tally: Mutex::new(RolloutTally::new(player_count)),
        }
    }

    // A panicking rollout thread cannot leave the counters half-written, so
    // the tally stays usable after poisoning.
    fn lock(&self) -> MutexGuard<'_, RolloutTally> {
        self.tally.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Configured quota.
    #[must_use]
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Record a playout result.
    ///
    /// Returns `false`, recording nothing, once the quota is met.
    pub fn add_result(&self, result: &GameResult) -> bool {
        let mut tally = self.lock();
        if tally.plays >= self.target {
            return false;
        }
        tally.record(result);
        true
    }

    /// Check if the quota is met.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.lock().plays >= self.target
    }

    /// Snapshot of the current tally.
    #[must_use]
    pub fn tally(&self) -> RolloutTally {
        self.lock().clone()
    }

    /// Consume the aggregator, returning the final tally.
    #[must_use]
    pub fn into_tally(self) -> RolloutTally {
        self.tally
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Run `config.rollouts` playouts from `state`.
///
/// Splits the work across threads when [`MCTSConfig::parallel_rollouts`]
/// says it pays off, otherwise plays them out on the calling thread.
pub fn run_rollouts<S: GameState>(state: &S, config: &MCTSConfig) -> Result<RolloutTally> {
    if config.parallel_rollouts() {
        return parallel_rollouts(state, config.rollouts, config.rollout_threads);
    }

    RandomSource::with(|rng| {
        let mut tally = RolloutTally::new(state.player_count());
        for _ in 0..config.rollouts {
            tally.record(&state.simulate_until_end(rng)?);
        }
        Ok(tally)
    })
}

/// Fill a quota of `target` playouts with `threads` racing threads.
pub fn parallel_rollouts<S: GameState>(
    state: &S,
    target: u32,
    threads: usize,
) -> Result<RolloutTally> {
    let aggregator = RolloutAggregator::new(target, state.player_count());
    trace!(target, threads, "parallel rollouts");

    thread::scope(|scope| {
        let handles: Vec<_> = (0..threads.max(1))
            .map(|_| {
                let aggregator = &aggregator;
                scope.spawn(move || -> Result<()> {
                    let local = state.duplicate();
                    RandomSource::with(|rng| {
                        while !aggregator.is_complete() {
                            let result = local.simulate_until_end(rng)?;
                            if !aggregator.add_result(&result) {
                                break;
                            }
                        }
                        Ok(())
                    })
                })
            })
            .collect();

        let mut outcome = Ok(());
        for handle in handles {
            let joined = handle
                .join()
                .map_err(|_| MctsError::WorkerPanicked)
                .and_then(|result| result);
            if outcome.is_ok() {
                outcome = joined;
            }
        }
        outcome
    })?;

    Ok(aggregator.into_tally())
}
