//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references. All node-level
//! operations (initialisation, expansion, UCB scoring, exhaustion
//! bookkeeping, backpropagation, best-child choice) live here because they
//! need to reach a node's parent or children through the arena.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{GameRng, PlayerId};
use crate::error::{MctsError, Result};
use crate::rules::GameState;

use super::config::MCTSConfig;
use super::node::{MCTSNode, NodeId};
use super::policy::SelectionPolicy;
use super::rollout::RolloutTally;

/// Arena-based MCTS tree.
///
/// Nodes are stored in creation order and referenced by `NodeId` indices.
/// Nodes are never removed; the whole arena is dropped together.
#[derive(Clone, Debug)]
pub struct MCTSTree<S: GameState> {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode<S>>,

    /// The root node ID (always 0).
    root: NodeId,

    /// First node created for each distinct position, in creation order.
    unique: Vec<NodeId>,

    /// Unique nodes bucketed by position fingerprint. A hit is confirmed
    /// by state equality, so colliding fingerprints never merge positions.
    fingerprints: FxHashMap<u64, SmallVec<[NodeId; 1]>>,
}

impl<S: GameState> MCTSTree<S> {
    /// Create a new tree rooted at `state`.
    pub fn new(state: S) -> Self {
        Self::with_capacity(state, 1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(state: S, capacity: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(capacity),
            root: NodeId::new(0),
            unique: Vec::new(),
            fingerprints: FxHashMap::default(),
        };
        tree.initialise(NodeId::NONE, None, state);
        tree
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<S> {
        self.get(self.root)
    }

    /// Get a node by ID.
    ///
    /// Panics on an ID from another tree; use [`try_get`](Self::try_get)
    /// for IDs from outside.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<S> {
        &self.nodes[id.0 as usize]
    }

    /// Get a node by ID, failing on unknown IDs.
    pub fn try_get(&self, id: NodeId) -> Result<&MCTSNode<S>> {
        self.nodes
            .get(id.0 as usize)
            .ok_or_else(|| MctsError::invalid_node(id, "no such node in this tree"))
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<S> {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty. A constructed tree always has a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node ID in creation order.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }

    /// First node created for each distinct position, in creation order.
    #[must_use]
    pub fn unique_nodes(&self) -> &[NodeId] {
        &self.unique
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode<S>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Allocate and initialise a node.
    ///
    /// A terminal position is scored immediately: one visit worth the
    /// mover's reward, and it is fully explored from the start.
    fn initialise(&mut self, parent: NodeId, mover: Option<PlayerId>, state: S) -> NodeId {
        let depth = if parent.is_none() {
            0
        } else {
            self.get(parent).depth + 1
        };

        let mut hasher = FxHasher::default();
        state.hash(&mut hasher);
        let fingerprint = hasher.finish();

        let id = NodeId::new(self.nodes.len() as u32);
        let mut node = MCTSNode::new(parent, mover, depth, state);

        if let Some(result) = node.outcome() {
            node.visits = 1;
            node.total_score = result.reward_for(node.perspective());
        }

        let nodes = &self.nodes;
        let bucket = self.fingerprints.entry(fingerprint).or_default();
        if !bucket.iter().any(|&seen| nodes[seen.0 as usize].state == node.state) {
            bucket.push(id);
            self.unique.push(id);
        }

        self.nodes.push(node);
        if !parent.is_none() {
            self.get_mut(parent).children.push(id);
        }

        self.check_fully_explored(id);
        id
    }

    /// Materialise one untried move of `id` as a new child.
    ///
    /// The move is picked uniformly at random from those remaining.
    pub fn expand(&mut self, id: NodeId, rng: &mut GameRng) -> Result<NodeId> {
        let node = self.try_get(id)?;
        if node.is_leaf() {
            return Err(MctsError::invalid_node(id, "cannot expand a terminal node"));
        }
        if node.untried.is_empty() {
            return Err(MctsError::invalid_node(id, "no untried moves left"));
        }

        let idx = rng.gen_range_usize(0..node.untried.len());
        let mover = node.state.current_player();
        let mut child_state = node.state.duplicate();
        child_state.make_move(&node.untried[idx])?;

        self.get_mut(id).untried.swap_remove(idx);
        let child = self.initialise(id, Some(mover), child_state);

        // The parent may have just lost its last untried move.
        self.check_fully_explored(id);

        trace!(parent = %id, child = %child, depth = self.get(child).depth, "expanded");
        Ok(child)
    }

    /// Selection score of `id` under `policy`, read against its parent's visits.
    #[must_use]
    pub fn ucb_value(&self, id: NodeId, policy: &dyn SelectionPolicy, config: &MCTSConfig) -> f64 {
        let node = self.get(id);
        let parent_visits = node.parent().map_or(node.visits, |p| self.get(p).visits);
        policy.score(parent_visits, node.visits, node.total_score, config)
    }

    /// Re-evaluate whether `id` is fully explored, propagating upward.
    ///
    /// A node is fully explored when it is a leaf, or when it has no untried
    /// moves and every child is fully explored. The flag never reverts.
    pub fn check_fully_explored(&mut self, id: NodeId) {
        let mut current = id;

        while !current.is_none() {
            let node = self.get(current);
            if node.fully_explored {
                return;
            }

            let explored = node.is_leaf()
                || (node.untried.is_empty()
                    && node.children.iter().all(|&c| self.get(c).fully_explored));
            if !explored {
                return;
            }

            self.get_mut(current).fully_explored = true;
            trace!(node = %current, "fully explored");
            current = self.get(current).parent;
        }
    }

    /// Add a rollout tally to `id` and every ancestor.
    ///
    /// Each node gains `tally.plays` visits and the reward of the player who
    /// moved into it. Visits are `u32`; [`MCTSConfig::validate`] keeps a
    /// search's total within range.
    pub fn update(&mut self, id: NodeId, tally: &RolloutTally) {
        let mut current = id;

        while !current.is_none() {
            let node = self.get_mut(current);
            node.visits += tally.plays;
            node.total_score += tally.reward_for(node.perspective());
            current = node.parent;
        }
    }

    /// Child recommended after search: most visits, ties broken by average.
    ///
    /// `None` while `id` has at most one visit or no children.
    #[must_use]
    pub fn best_child(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id);
        if node.visits <= 1 {
            return None;
        }

        node.children.iter().copied().max_by(|&a, &b| {
            let (a, b) = (self.get(a), self.get(b));
            a.visits.cmp(&b.visits).then_with(|| {
                a.average_score()
                    .partial_cmp(&b.average_score())
                    .unwrap_or(Ordering::Equal)
            })
        })
    }

    /// Non-exhausted child of `id` with the highest selection score.
    #[must_use]
    pub fn select_child(
        &self,
        id: NodeId,
        policy: &dyn SelectionPolicy,
        config: &MCTSConfig,
    ) -> Option<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .filter(|&c| !self.get(c).fully_explored)
            .map(|c| (c, self.ucb_value(c, policy, config)))
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .map(|(c, _)| c)
    }

    /// Selection phase: descend from the root to the node to expand.
    ///
    /// Stops at the first node with untried moves, or at a leaf.
    #[must_use]
    pub fn select(&self, policy: &dyn SelectionPolicy, config: &MCTSConfig) -> NodeId {
        let mut current = self.root;

        loop {
            let node = self.get(current);
            if node.is_leaf() || node.has_untried() {
                return current;
            }

            match self.select_child(current, policy, config) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// The chain of best children from the root.
    #[must_use]
    pub fn principal_variation(&self) -> Vec<NodeId> {
        let mut line = Vec::new();
        let mut current = self.root;

        while let Some(child) = self.best_child(current) {
            line.push(child);
            current = child;
        }
        line
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let leaf_count = self.nodes.iter().filter(|n| n.is_leaf()).count();
        let fully_explored_count = self.nodes.iter().filter(|n| n.fully_explored).count();
        let expanded_count = self.nodes.iter().filter(|n| !n.children.is_empty()).count();

        TreeStats {
            node_count: self.nodes.len(),
            unique_count: self.unique.len(),
            max_depth,
            leaf_count,
            fully_explored_count,
            expanded_count,
            root_visits: self.root_node().visits,
        }
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Number of distinct positions.
    pub unique_count: usize,

    /// Maximum depth reached.
    pub max_depth: u32,

    /// Number of terminal nodes.
    pub leaf_count: usize,

    /// Number of fully explored nodes.
    pub fully_explored_count: usize,

    /// Number of nodes with at least one child.
    pub expanded_count: usize,

    /// Visits recorded at the root.
    pub root_visits: u32,
}

impl TreeStats {
    /// Average children per expanded node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.expanded_count == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / self.expanded_count as f64
        }
    }
}
