//! Monte Carlo Tree Search.
//!
//! ## Overview
//!
//! A generic MCTS engine for any two-or-more player, perfect-information,
//! turn-based game that implements [`GameState`](crate::rules::GameState).
//!
//! - **Arena tree**: nodes live in one `Vec`, addressed by [`NodeId`]
//! - **Lazy expansion**: one untried move becomes a child per step
//! - **Exhaustion tracking**: fully explored subtrees are skipped
//! - **Parallel rollouts**: one quota raced by several threads
//! - **Shared search**: many [`Worker`]s can drive one [`TreeSearch`]
//!
//! ## Usage
//!
//! ```rust
//! use mcts_engine::games::TicTacToe;
//! use mcts_engine::mcts::{MCTSConfig, TreeSearch};
//!
//! let search = TreeSearch::new(TicTacToe::new(), MCTSConfig::default()).unwrap();
//! search.run_steps(1000).unwrap();
//!
//! if let Some(mv) = search.best_move().unwrap() {
//!     println!("Best move: {:?}", mv);
//! }
//! ```
//!
//! ## Background search
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use mcts_engine::games::Connect4;
//! use mcts_engine::mcts::{MCTSConfig, TreeSearch, Worker};
//!
//! let search = Arc::new(TreeSearch::new(Connect4::new(), MCTSConfig::default()).unwrap());
//! let workers = Worker::spawn_pool(4, &search).unwrap();
//!
//! std::thread::sleep(Duration::from_millis(50));
//! search.finish();
//!
//! for worker in workers {
//!     worker.join().unwrap();
//! }
//! println!("{} nodes", search.node_count().unwrap());
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod rollout;
pub mod search;
pub mod stats;
pub mod tree;
pub mod worker;

// Re-export main types
pub use config::MCTSConfig;
pub use node::{MCTSNode, NodeId};
pub use policy::{Greedy, SelectionPolicy, UCB1};
pub use rollout::{parallel_rollouts, run_rollouts, RolloutAggregator, RolloutTally};
pub use search::{StepOutcome, TreeSearch};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
pub use worker::{StopReason, Worker, WorkerReport};
