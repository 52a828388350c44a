//! # mcts-engine
//!
//! A generic Monte Carlo Tree Search engine for turn-based,
//! perfect-information games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: The search only sees the [`GameState`] trait.
//!    Rules, move types and win detection belong to the game.
//!
//! 2. **N-Player Aware**: Rewards are credited to the player who made each
//!    move, so the same tree code serves two or more players.
//!
//! 3. **Shareable Search**: A [`TreeSearch`] is `Sync`. Any number of
//!    threads or [`Worker`]s can drive it; cycles are serialised, playouts
//!    inside a cycle can run in parallel.
//!
//! ## Architecture
//!
//! - **Arena Tree**: Nodes live in one `Vec` and refer to each other by
//!   [`NodeId`]. No reference counting, no cycles.
//!
//! - **Lazy Expansion**: Each step materialises a single untried move.
//!
//! - **Exhaustion Tracking**: Subtrees whose every line has been played to
//!   the end are skipped by Selection; a search over a small game stops on
//!   its own.
//!
//! ## Modules
//!
//! - `core`: Players, per-player maps, RNG
//! - `rules`: The `GameState` contract and game results
//! - `mcts`: Tree, search, rollouts, workers
//! - `games`: Tic-Tac-Toe and Connect Four
//! - `codec`: Binary encoding and length-prefixed frames
//! - `error`: Error type and `Result` alias

pub mod codec;
pub mod core;
pub mod error;
pub mod games;
pub mod mcts;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{GameRng, PlayerId, PlayerMap, RandomSource};

pub use crate::error::{MctsError, Result};

pub use crate::rules::{GameResult, GameState};

pub use crate::mcts::{
    MCTSConfig, MCTSNode, MCTSTree, NodeId, RolloutAggregator, RolloutTally, SearchStats,
    SelectionPolicy, StepOutcome, TreeSearch, TreeStats, Worker, WorkerReport, UCB1,
};

pub use crate::games::{Connect4, TicTacToe};
