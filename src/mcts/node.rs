//! MCTS node and edge structures.
//!
//! Uses arena-based allocation with index references (NodeId) for efficiency
//! and serializability. A node's statistics describe the move that led to it,
//! seen from the player who made that move.

use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::rules::GameResult;

/// Index into the MctsTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
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

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
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

/// Link from a node to the child reached by playing `action`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Linear board index of the move.
    pub action: usize,

    /// Child node.
    pub child: NodeId,
}

/// A node in the MCTS tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MctsNode {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Move that led here from the parent (None for the first root of a game).
    pub action: Option<usize>,

    /// Predictor prior for `action` (1.0 at the root).
    pub prior: f32,

    /// Player to move at this node.
    pub color: Color,

    /// Completed simulations whose path passed through this node (N).
    pub visits: u32,

    /// Sum of backed-up values (W).
    pub total_value: f64,

    /// W / N, zero before the first visit (Q).
    pub mean_value: f64,

    /// Children, kept sorted by action. Empty until expansion.
    pub children: Vec<Edge>,

    /// Is this a decided position (win or full board)?
    pub is_end: bool,

    /// Why the position is decided.
    pub end_reason: Option<GameResult>,

    /// Cached value of a terminal node, fixed when it is discovered.
    pub value: f64,

    /// Has root noise already been mixed into this node's children?
    pub noised: bool,
}

impl MctsNode {
    /// Create a child node.
    pub fn new(parent: NodeId, action: usize, prior: f32, color: Color) -> Self {
        Self {
            parent,
            action: Some(action),
            prior,
            color,
            visits: 0,
            total_value: 0.0,
            mean_value: 0.0,
            children: Vec::new(),
            is_end: false,
            end_reason: None,
            value: 0.0,
            noised: false,
        }
    }

    /// Create a root node.
    pub fn root(color: Color) -> Self {
        Self {
            action: None,
            ..Self::new(NodeId::NONE, 0, 1.0, color)
        }
    }

    /// A node with no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Visit count.
    #[inline]
    #[allow(non_snake_case)]
    #[must_use]
    pub fn N(&self) -> u32 {
        self.visits
    }

    /// Mean action value.
    #[inline]
    #[allow(non_snake_case)]
    #[must_use]
    pub fn Q(&self) -> f64 {
        self.mean_value
    }

    /// Add one backed-up value to this node's statistics.
    #[inline]
    pub fn record(&mut self, value: f64) {
        self.visits += 1;
        self.total_value += value;
        self.mean_value = self.total_value / f64::from(self.visits);
    }

    /// Child reached by `action`, if it exists.
    #[must_use]
    pub fn child(&self, action: usize) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&action, |e| e.action)
            .ok()
            .map(|i| self.children[i].child)
    }

    /// Flag this node as a decided position with a fixed value.
    pub fn mark_terminal(&mut self, reason: GameResult, value: f64) {
        debug_assert!(reason.is_decisive());
        self.is_end = true;
        self.end_reason = Some(reason);
        self.value = value;
    }
}
