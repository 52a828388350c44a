//! Core engine types: players and random number generation.
//!
//! These are game-agnostic building blocks shared by the rules contract and
//! the search.

pub mod player;
pub mod rng;

pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, RandomSource};
