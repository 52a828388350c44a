//! The game-state contract the search is generic over.
//!
//! Games implement `GameState` to define their rules:
//! - What moves are legal
//! - How a move modifies the state
//! - When the game is over and who won

use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{GameRng, PlayerId};
use crate::error::Result;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Reward for a win.
    pub const WIN: f64 = 1.0;
    /// Reward for a draw.
    pub const DRAW: f64 = 0.5;
    /// Reward for a loss.
    pub const LOSS: f64 = 0.0;

    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }

    /// Scalar reward of this outcome from `player`'s point of view.
    #[must_use]
    pub fn reward_for(&self, player: PlayerId) -> f64 {
        match self {
            GameResult::Winner(p) if *p == player => Self::WIN,
            GameResult::Winner(_) => Self::LOSS,
            GameResult::Draw => Self::DRAW,
        }
    }
}

/// Game-state contract.
///
/// ## Implementation Notes
///
/// - `winner` returns `None` while the game continues and must never revert
///   to `None` once set
/// - `make_move` must be deterministic: two peers applying the same move to
///   equal states must end up with equal states
/// - `possible_moves` may be empty or non-empty on a decided board;
///   terminality is governed by `winner`
/// - `Clone` must be a deep copy; the search relies on it to give every
///   node its own board
/// - `Eq` and `Hash` identify positions. They may ignore move history so
///   that transpositions compare equal, but must agree with each other
pub trait GameState: Clone + Debug + Eq + Hash + Send + Sync + 'static {
    /// One ply of this game.
    type Move: Clone + Eq + Hash + Debug + Send + Sync + Serialize + DeserializeOwned + 'static;

    /// Number of players taking turns. Every shipped game has two.
    fn player_count(&self) -> u8 {
        2
    }

    /// Player about to move.
    fn current_player(&self) -> PlayerId;

    /// Outcome once the game is over, `None` while it continues.
    fn winner(&self) -> Option<GameResult>;

    /// The most recently applied move, if any.
    fn last_move(&self) -> Option<&Self::Move>;

    /// All legal moves from this state.
    fn possible_moves(&self) -> Vec<Self::Move>;

    /// Apply `mv` for the current player.
    ///
    /// Recomputes the winner, advances the current player, and returns the
    /// same state. Fails with [`MctsError::InvalidMove`] when the move
    /// cannot be applied to this exact state.
    ///
    /// [`MctsError::InvalidMove`]: crate::MctsError::InvalidMove
    fn make_move(&mut self, mv: &Self::Move) -> Result<&mut Self>;

    // === Convenience Methods ===

    /// Deep copy of this state.
    fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Check if the game is over.
    fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    /// Player who moved last, derived from the rotation.
    fn previous_player(&self) -> PlayerId {
        self.current_player().previous(self.player_count())
    }

    /// Player who moves after the current one.
    fn next_player(&self) -> PlayerId {
        self.current_player().next(self.player_count())
    }

    /// Play uniformly random legal moves on a copy until the game ends.
    ///
    /// The receiver is left untouched. A copy that runs out of moves
    /// without declaring a winner is scored as a draw. A listed move that
    /// the rules then reject is returned as an error.
    fn simulate_until_end(&self, rng: &mut GameRng) -> Result<GameResult> {
        let mut sim = self.duplicate();

        loop {
            if let Some(result) = sim.winner() {
                return Ok(result);
            }

            let moves = sim.possible_moves();
            if moves.is_empty() {
                return Ok(GameResult::Draw);
            }

            let idx = rng.gen_range_usize(0..moves.len());
            sim.make_move(&moves[idx])?;
        }
    }
}
