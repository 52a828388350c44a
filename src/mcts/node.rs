//! MCTS node structures.
//!
//! Uses arena-based allocation with index references (NodeId). A node
//! refers to its parent and children by handle, never by pointer, so the
//! parent/child cycle carries no ownership.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PlayerId;
use crate::rules::{GameResult, GameState};

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the MCTS tree.
///
/// Statistics are written only by [`MCTSTree`](super::MCTSTree); outside
/// the crate a node is a read-only view.
#[derive(Clone, Debug)]
pub struct MCTSNode<S: GameState> {
    /// Parent node (NONE for root).
    pub(crate) parent: NodeId,

    /// Player whose move produced this node. `None` for the root.
    pub(crate) mover: Option<PlayerId>,

    /// Game position at this node, owned exclusively by the node.
    pub(crate) state: S,

    /// Expanded children in creation order.
    /// SmallVec optimizes for typical branching factor <= 8.
    pub(crate) children: SmallVec<[NodeId; 8]>,

    /// Legal moves not yet expanded into children.
    pub(crate) untried: Vec<S::Move>,

    /// Depth in tree (root = 0).
    pub(crate) depth: u32,

    /// Total visits to this node.
    pub(crate) visits: u32,

    /// Sum of rewards credited to `mover`.
    pub(crate) total_score: f64,

    /// No further search below this node can change anything.
    pub(crate) fully_explored: bool,
}

impl<S: GameState> MCTSNode<S> {
    /// Create a node with no statistics.
    ///
    /// Untried moves are taken from the state unless it is terminal.
    pub(crate) fn new(parent: NodeId, mover: Option<PlayerId>, depth: u32, state: S) -> Self {
        let untried = if state.is_terminal() {
            Vec::new()
        } else {
            state.possible_moves()
        };

        Self {
            parent,
            mover,
            state,
            children: SmallVec::new(),
            untried,
            depth,
            visits: 0,
            total_score: 0.0,
            fully_explored: false,
        }
    }

    /// Parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        if self.parent.is_none() {
            None
        } else {
            Some(self.parent)
        }
    }

    /// Game position at this node.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Move that led from the parent to this node.
    #[must_use]
    pub fn last_move(&self) -> Option<&S::Move> {
        self.state.last_move()
    }

    /// Player whose move produced this node.
    #[must_use]
    pub fn mover(&self) -> Option<PlayerId> {
        self.mover
    }

    /// Player credited by this node's score.
    ///
    /// For the root, the player who moved before the search began.
    #[must_use]
    pub fn perspective(&self) -> PlayerId {
        self.mover.unwrap_or_else(|| self.state.previous_player())
    }

    /// Expanded children in creation order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Legal moves not yet expanded.
    #[must_use]
    pub fn untried_moves(&self) -> &[S::Move] {
        &self.untried
    }

    /// Check if any moves remain unexpanded.
    #[must_use]
    pub fn has_untried(&self) -> bool {
        !self.untried.is_empty()
    }

    /// Depth in tree (root = 0).
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Total visits to this node.
    #[must_use]
    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Sum of rewards credited to this node's mover.
    #[must_use]
    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    /// Mean reward, 0.0 before the first visit.
    #[must_use]
    pub fn average_score(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_score / self.visits as f64
        }
    }

    /// Terminal positions are leaves.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.state.is_terminal()
    }

    /// Outcome if this node is a leaf.
    #[must_use]
    pub fn outcome(&self) -> Option<GameResult> {
        self.state.winner()
    }

    /// No further search below this node can change anything.
    #[must_use]
    pub fn is_fully_explored(&self) -> bool {
        self.fully_explored
    }
}
