//! Core MCTS search algorithm.
//!
//! Implements the four-phase cycle, one expansion per [`TreeSearch::step`]:
//! 1. Selection: descend by UCB1 through non-exhausted children
//! 2. Expansion: materialise one untried move
//! 3. Simulation: random playouts from the new node (skipped for terminals)
//! 4. Backpropagation: add the playout tally to every ancestor
//!
//! The tree sits behind a single mutex, so any number of threads may call
//! `step` on a shared search and cycles never interleave. Playouts inside a
//! step may still fan out across threads (see [`rollout`](super::rollout)).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::core::GameRng;
use crate::error::{MctsError, Result};
use crate::rules::GameState;

use super::config::MCTSConfig;
use super::node::NodeId;
use super::policy::{SelectionPolicy, UCB1};
use super::rollout::{run_rollouts, RolloutTally};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// What a call to [`TreeSearch::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A node was added and its value backpropagated.
    Expanded(NodeId),
    /// The root is fully explored; nothing is left to search.
    Exhausted,
    /// The tree has reached `max_nodes`.
    NodeLimit,
}

/// Mutable search state guarded by the step lock.
struct SearchCore<S: GameState> {
    tree: MCTSTree<S>,
    rng: GameRng,
    stats: SearchStats,
}

/// Main MCTS search context.
///
/// Generic over the game-state type. Owns the search tree and
/// configuration; share it across threads with `Arc`.
pub struct TreeSearch<S: GameState> {
    /// Search configuration.
    config: MCTSConfig,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Tree, expansion RNG and statistics.
    core: Mutex<SearchCore<S>>,

    /// Cooperative cancellation flag.
    finished: AtomicBool,
}

impl<S: GameState> TreeSearch<S> {
    /// Create a new search rooted at `state`.
    pub fn new(state: S, config: MCTSConfig) -> Result<Self> {
        config.validate()?;

        let capacity = config.max_nodes.min(4096);
        let core = SearchCore {
            tree: MCTSTree::with_capacity(state, capacity),
            rng: GameRng::new(config.seed),
            stats: SearchStats::default(),
        };

        Ok(Self {
            config,
            selection: Box::new(UCB1),
            core: Mutex::new(core),
            finished: AtomicBool::new(false),
        })
    }

    /// Set a custom selection policy.
    pub fn with_selection<P: SelectionPolicy + 'static>(mut self, selection: P) -> Self {
        self.selection = Box::new(selection);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, SearchCore<S>>> {
        self.core.lock().map_err(|_| MctsError::LockPoisoned)
    }

    /// Run one Select-Expand-Simulate-Backpropagate cycle.
    ///
    /// Serialised against other `step` calls on the same search.
    pub fn step(&self) -> Result<StepOutcome> {
        let mut guard = self.lock()?;
        // Time spent waiting on the lock is not search time
        let start = Instant::now();
        let SearchCore { tree, rng, stats } = &mut *guard;

        if tree.root_node().is_fully_explored() {
            return Ok(StepOutcome::Exhausted);
        }
        if tree.len() >= self.config.max_nodes {
            return Ok(StepOutcome::NodeLimit);
        }

        // === SELECTION ===
        let selected = tree.select(self.selection.as_ref(), &self.config);

        // === EXPANSION ===
        let child = tree.expand(selected, rng)?;
        let node = tree.get(child);
        let depth = node.depth();
        let player_count = node.state().player_count();
        stats.nodes_expanded += 1;
        stats.max_depth = stats.max_depth.max(depth);

        match node.outcome() {
            Some(result) => {
                // Value fixed at creation; credit the ancestors only.
                stats.terminal_expansions += 1;
                let tally = RolloutTally::from_result(&result, player_count);
                tree.update(selected, &tally);
            }
            None => {
                // === SIMULATION ===
                let tally = run_rollouts(node.state(), &self.config)?;
                stats.simulations += u64::from(tally.plays);
                if self.config.parallel_rollouts() {
                    stats.parallel_batches += 1;
                }

                // === BACKPROPAGATION ===
                tree.update(child, &tally);
            }
        }

        stats.steps += 1;
        stats.time_us += start.elapsed().as_micros() as u64;
        trace!(node = %child, depth, nodes = tree.len(), "step");

        Ok(StepOutcome::Expanded(child))
    }

    /// Run up to `max_steps` steps, stopping early when finished,
    /// exhausted, or at the node limit. Returns the number of expansions.
    pub fn run_steps(&self, max_steps: u64) -> Result<u64> {
        let mut done = 0;
        while done < max_steps && !self.is_finished() {
            match self.step()? {
                StepOutcome::Expanded(_) => done += 1,
                outcome => {
                    debug!(?outcome, done, "search stopped");
                    break;
                }
            }
        }
        Ok(done)
    }

    /// Step until `budget` has elapsed, with the same early stops as
    /// [`run_steps`](Self::run_steps).
    ///
    /// The budget is checked between steps; a slow step can overrun it.
    pub fn run_for(&self, budget: Duration) -> Result<u64> {
        let start = Instant::now();
        let mut done = 0;
        while start.elapsed() < budget && !self.is_finished() {
            match self.step()? {
                StepOutcome::Expanded(_) => done += 1,
                outcome => {
                    debug!(?outcome, done, "search stopped");
                    break;
                }
            }
        }
        Ok(done)
    }

    /// Ask every driver of this search to stop.
    ///
    /// Cooperative: in-flight steps complete, and loops exit when they next
    /// check [`is_finished`](Self::is_finished).
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Release);
    }

    /// Check if [`finish`](Self::finish) has been called.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// The root node ID.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Read-only access to the tree.
    ///
    /// Holds the step lock for the duration of `f`.
    pub fn with_tree<R>(&self, f: impl FnOnce(&MCTSTree<S>) -> R) -> Result<R> {
        let guard = self.lock()?;
        Ok(f(&guard.tree))
    }

    /// Number of nodes materialised so far.
    pub fn node_count(&self) -> Result<usize> {
        self.with_tree(|tree| tree.len())
    }

    /// Number of distinct positions materialised so far.
    pub fn unique_node_count(&self) -> Result<usize> {
        self.with_tree(|tree| tree.unique_nodes().len())
    }

    /// Every node ID in creation order.
    pub fn all_nodes(&self) -> Result<Vec<NodeId>> {
        self.with_tree(|tree| tree.all_nodes().collect())
    }

    /// First node of each distinct position, in creation order.
    pub fn unique_nodes(&self) -> Result<Vec<NodeId>> {
        self.with_tree(|tree| tree.unique_nodes().to_vec())
    }

    /// Best child of `node` by the post-search policy.
    ///
    /// Fails with [`MctsError::InvalidNode`] for an unknown ID.
    pub fn best_node_choice(&self, node: NodeId) -> Result<Option<NodeId>> {
        let guard = self.lock()?;
        guard.tree.try_get(node)?;
        Ok(guard.tree.best_child(node))
    }

    /// Recommended move from the root, if enough has been searched.
    pub fn best_move(&self) -> Result<Option<S::Move>> {
        self.with_tree(|tree| {
            tree.best_child(tree.root())
                .and_then(|child| tree.get(child).last_move().cloned())
        })
    }

    /// Moves along the chain of best children from the root.
    pub fn principal_variation(&self) -> Result<Vec<S::Move>> {
        self.with_tree(|tree| {
            tree.principal_variation()
                .into_iter()
                .filter_map(|id| tree.get(id).last_move().cloned())
                .collect()
        })
    }

    /// Snapshot of search statistics.
    pub fn stats(&self) -> Result<SearchStats> {
        Ok(self.lock()?.stats.clone())
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Consume the search, returning its tree.
    pub fn into_tree(self) -> Result<MCTSTree<S>> {
        self.core
            .into_inner()
            .map(|core| core.tree)
            .map_err(|_| MctsError::LockPoisoned)
    }
}
