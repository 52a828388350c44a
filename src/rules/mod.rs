//! Game-state contract for game implementations.
//!
//! Games implement `GameState` to define:
//! - Legal moves for each state
//! - How moves modify state
//! - Win/draw conditions
//!
//! The search calls into `GameState` but never interprets game-specific
//! concepts directly.

pub mod state;

pub use state::{GameResult, GameState};
