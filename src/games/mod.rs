//! Reference game implementations.
//!
//! These satisfy the `GameState` contract and drive the engine's tests
//! end to end. Both are two-player games with player 1 moving first.

pub mod connect4;
pub mod tictactoe;

pub use connect4::{Connect4, Column};
pub use tictactoe::{Cell, TicTacToe};
