//! Background search threads.
//!
//! A [`Worker`] drives a shared [`TreeSearch`] from its own thread until the
//! search is finished, runs out of work, or fails. Any number of workers can
//! share one search; their steps are serialised by the search itself.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::{MctsError, Result};
use crate::rules::GameState;

use super::search::{StepOutcome, TreeSearch};

/// Why a worker stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// [`TreeSearch::finish`] was called.
    Finished,
    /// The root became fully explored.
    Exhausted,
    /// The tree reached its node limit.
    NodeLimit,
}

/// Summary returned by [`Worker::join`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerReport {
    /// Expansions this worker performed.
    pub steps: u64,
    /// Why the loop ended.
    pub reason: StopReason,
}

/// Handle to a thread repeatedly calling [`TreeSearch::step`].
pub struct Worker {
    id: usize,
    handle: JoinHandle<Result<WorkerReport>>,
}

impl Worker {
    /// Start a worker on `search`.
    ///
    /// `id` only labels log output.
    pub fn spawn<S: GameState>(id: usize, search: Arc<TreeSearch<S>>) -> Result<Self> {
        let handle = thread::Builder::new()
            .name(format!("mcts-worker-{id}"))
            .spawn(move || run(id, &search))?;

        debug!(worker = id, "worker started");
        Ok(Self { id, handle })
    }

    /// Start `count` workers on the same search.
    pub fn spawn_pool<S: GameState>(
        count: usize,
        search: &Arc<TreeSearch<S>>,
    ) -> Result<Vec<Self>> {
        (0..count).map(|id| Self::spawn(id, Arc::clone(search))).collect()
    }

    /// Label given at spawn.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Check if the thread has exited.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the thread to exit.
    ///
    /// Returns the error that stopped the loop, or
    /// [`MctsError::WorkerPanicked`] if the thread panicked.
    pub fn join(self) -> Result<WorkerReport> {
        self.handle.join().map_err(|_| MctsError::WorkerPanicked)?
    }
}

fn run<S: GameState>(id: usize, search: &TreeSearch<S>) -> Result<WorkerReport> {
    let mut steps = 0;

    let reason = loop {
        if search.is_finished() {
            break StopReason::Finished;
        }

        match search.step() {
            Ok(StepOutcome::Expanded(_)) => steps += 1,
            Ok(StepOutcome::Exhausted) => break StopReason::Exhausted,
            Ok(StepOutcome::NodeLimit) => break StopReason::NodeLimit,
            Err(err) => {
                warn!(worker = id, steps, error = %err, "worker stopped on error");
                return Err(err);
            }
        }
    };

    debug!(worker = id, steps, ?reason, "worker stopped");
    Ok(WorkerReport { steps, reason })
}
