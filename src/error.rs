//! Error types for the engine.
//!
//! Every failure surface in the engine is programmer-error shaped: a move
//! that cannot be applied, a call that assumes tree structure that does not
//! exist, or a broken wire frame. Nothing here is retried internally.

use thiserror::Error;

use crate::mcts::NodeId;

/// Main error type for the engine.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MctsError {
    #[error("invalid move: {reason}")]
    InvalidMove { reason: String },

    #[error("invalid node {node}: {reason}")]
    InvalidNode { node: NodeId, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("search lock poisoned by a panicking thread")]
    LockPoisoned,

    #[error("worker thread panicked")]
    WorkerPanicked,
}

impl MctsError {
    /// Shorthand for an [`MctsError::InvalidMove`].
    pub fn invalid_move(reason: impl Into<String>) -> Self {
        Self::InvalidMove {
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`MctsError::InvalidNode`].
    pub fn invalid_node(node: NodeId, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            node,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MctsError>;
