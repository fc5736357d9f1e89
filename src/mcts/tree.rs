//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MctsNode>` with index-based references. Children are
//! owned by their parent through `Edge`s; the parent link is a plain index
//! used only for backup. Promoting a child to root compacts the arena so the
//! discarded siblings are freed.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::node::{Edge, MctsNode, NodeId};
use crate::core::Color;

/// Arena-based MCTS tree.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
/// This avoids reference counting overhead and enables serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MctsTree {
    /// All nodes in the tree.
    nodes: Vec<MctsNode>,

    /// The root node ID (always 0 after reset or promotion).
    root: NodeId,
}

impl MctsTree {
    /// Create a new tree with a root node.
    pub fn new(root_color: Color) -> Self {
        Self::with_capacity(root_color, 1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(root_color: Color, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MctsNode::root(root_color));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MctsNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MctsNode {
        self.get(self.root)
    }

    /// Get the root node mutably.
    pub fn root_node_mut(&mut self) -> &mut MctsNode {
        self.get_mut(self.root)
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MctsNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Clear the tree and reset with a new root.
    pub fn reset(&mut self, root_color: Color) {
        self.nodes.clear();
        self.nodes.push(MctsNode::root(root_color));
        self.root = NodeId::new(0);
    }

    /// Create children of `id` for every legal action it does not have yet.
    ///
    /// Each child takes its prior from `priors[action]` and has the opposite
    /// color to move. Returns the number of children created.
    pub fn expand(&mut self, id: NodeId, priors: &[f32], legal: &[bool]) -> usize {
        debug_assert_eq!(priors.len(), legal.len());
        let child_color = self.get(id).color.opposite();

        let missing: Vec<usize> = legal
            .iter()
            .enumerate()
            .filter(|&(action, &ok)| ok && self.get(id).child(action).is_none())
            .map(|(action, _)| action)
            .collect();

        let mut edges = Vec::with_capacity(missing.len());
        for action in missing {
            let prior = priors.get(action).copied().unwrap_or(0.0);
            let child = self.alloc(MctsNode::new(id, action, prior, child_color));
            edges.push(Edge { action, child });
        }

        let created = edges.len();
        let node = self.get_mut(id);
        node.children.extend(edges);
        node.children.sort_unstable_by_key(|e| e.action);
        created
    }

    /// Propagate a value from `id` up to the root.
    ///
    /// `id` records `value`, its parent `-value`, and so on, alternating
    /// perspective with every level.
    pub fn backup(&mut self, id: NodeId, value: f64) {
        let mut current = id;
        let mut value = value;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.record(value);
            current = node.parent;
            value = -value;
        }
    }

    /// Make the child reached by `action` the new root, dropping everything
    /// outside its subtree.
    ///
    /// Returns `None` (leaving the tree untouched) if the root has no such child.
    pub fn promote(&mut self, action: usize) -> Option<NodeId> {
        let child = self.root_node().child(action)?;

        // Breadth-first order of the kept subtree becomes the new arena order.
        let mut order = Vec::with_capacity(self.subtree_size(child));
        let mut queue = VecDeque::from([child]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.get(id).children.iter().map(|e| e.child));
        }

        let mut remap = vec![NodeId::NONE; self.nodes.len()];
        for (new, old) in order.iter().enumerate() {
            remap[old.index()] = NodeId::new(new as u32);
        }

        let mut old_nodes: Vec<Option<MctsNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for old in order {
            if let Some(mut node) = old_nodes[old.index()].take() {
                node.parent = if old == child { NodeId::NONE } else { remap[node.parent.index()] };
                for edge in &mut node.children {
                    edge.child = remap[edge.child.index()];
                }
                nodes.push(node);
            }
        }

        self.nodes = nodes;
        self.root = NodeId::new(0);
        Some(self.root)
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    #[must_use]
    pub fn subtree_size(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend(self.get(current).children.iter().map(|e| e.child));
        }
        count
    }

    /// All nodes reachable from the root.
    #[must_use]
    pub fn reachable(&self) -> FxHashSet<NodeId> {
        let mut seen = FxHashSet::default();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            if seen.insert(current) {
                stack.extend(self.get(current).children.iter().map(|e| e.child));
            }
        }
        seen
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            node_count: self.nodes.len(),
            root_visits: self.root_node().visits,
            ..TreeStats::default()
        };

        let mut queue = VecDeque::from([(self.root, 0u16)]);
        while let Some((id, depth)) = queue.pop_front() {
            let node = self.get(id);
            stats.max_depth = stats.max_depth.max(depth);
            if node.is_end {
                stats.terminal_count += 1;
            }
            if node.is_leaf() {
                stats.leaf_count += 1;
            }
            queue.extend(node.children.iter().map(|e| (e.child, depth + 1)));
        }

        stats
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth below the root.
    pub max_depth: u16,

    /// Number of terminal nodes.
    pub terminal_count: usize,

    /// Number of nodes without children.
    pub leaf_count: usize,

    /// Visits at the root.
    pub root_visits: u32,
}

impl TreeStats {
    /// Average number of children per expanded node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let internal = self.node_count.saturating_sub(self.leaf_count);
        if internal == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / internal as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(n: usize) -> Vec<f32> {
        vec![1.0 / n as f32; n]
    }

    #[test]
    fn test_tree_new() {
        let tree = MctsTree::new(Color::Black);

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId::new(0));
        assert_eq!(tree.root_node().color, Color::Black);
    }

    #[test]
    fn test_expand_creates_legal_children_only() {
        let mut tree = MctsTree::new(Color::Black);
        let legal = [true, false, true, true];
        let root = tree.root();

        let created = tree.expand(root, &[0.1, 0.2, 0.3, 0.4], &legal);

        assert_eq!(created, 3);
        let actions: Vec<_> = tree.root_node().children.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![0, 2, 3]);

        let child = tree.get(tree.root_node().child(2).unwrap());
        assert_eq!(child.color, Color::White);
        assert_eq!(child.prior, 0.3);
        assert_eq!(child.parent, root);
        assert_eq!(child.action, Some(2));
    }

    #[test]
    fn test_expand_does_not_duplicate() {
        let mut tree = MctsTree::new(Color::Black);
        let root = tree.root();
        tree.expand(root, &uniform(4), &[true, true, false, false]);

        let created = tree.expand(root, &uniform(4), &[true, true, true, true]);

        assert_eq!(created, 2);
        assert_eq!(tree.root_node().children.len(), 4);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_backup_alternates_sign() {
        let mut tree = MctsTree::new(Color::Black);
        let root = tree.root();
        tree.expand(root, &uniform(2), &[true, true]);
        let child = tree.root_node().child(1).unwrap();
        tree.expand(child, &uniform(2), &[true, false]);
        let grandchild = tree.get(child).child(0).unwrap();

        tree.backup(grandchild, 0.5);

        assert_eq!(tree.get(grandchild).total_value, 0.5);
        assert_eq!(tree.get(child).total_value, -0.5);
        assert_eq!(tree.get(root).total_value, 0.5);
        assert_eq!(tree.get(root).visits, 1);
        assert_eq!(tree.get(child).visits, 1);
    }

    #[test]
    fn test_promote_discards_siblings() {
        let mut tree = MctsTree::new(Color::Black);
        let root = tree.root();
        tree.expand(root, &uniform(3), &[true, true, true]);
        let keep = tree.root_node().child(1).unwrap();
        tree.expand(keep, &uniform(3), &[true, false, true]);
        let drop = tree.root_node().child(2).unwrap();
        tree.expand(drop, &uniform(3), &[true, true, false]);
        tree.get_mut(keep).visits = 7;

        let kept_size = tree.subtree_size(keep);
        let new_root = tree.promote(1).unwrap();

        assert_eq!(tree.len(), kept_size);
        assert_eq!(tree.len(), 3);
        assert_eq!(new_root, tree.root());
        assert!(tree.root_node().parent.is_none());
        assert_eq!(tree.root_node().visits, 7);
        assert_eq!(tree.root_node().color, Color::White);
        assert_eq!(tree.reachable().len(), tree.len());

        for (id, node) in tree.iter() {
            if id != tree.root() {
                assert_eq!(node.parent, tree.root());
            }
        }
    }

    #[test]
    fn test_promote_missing_child() {
        let mut tree = MctsTree::new(Color::Black);
        assert!(tree.promote(0).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_tree_reset() {
        let mut tree = MctsTree::new(Color::Black);
        let root = tree.root();
        tree.expand(root, &uniform(4), &[true; 4]);
        assert_eq!(tree.len(), 5);

        tree.reset(Color::Black);

        assert_eq!(tree.len(), 1);
        assert!(tree.root_node().is_leaf());
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MctsTree::new(Color::Black);
        let root = tree.root();
        tree.expand(root, &uniform(2), &[true, true]);
        let child = tree.root_node().child(0).unwrap();
        tree.get_mut(child).mark_terminal(crate::rules::GameResult::Full, 0.0);
        tree.backup(child, 1.0);

        let stats = tree.stats();

        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.terminal_count, 1);
        assert_eq!(stats.leaf_count, 2);
        assert_eq!(stats.root_visits, 1);
        assert_eq!(stats.branching_factor(), 2.0);
    }

    #[test]
    fn test_tree_serialization() {
        let mut tree = MctsTree::new(Color::Black);
        let root = tree.root();
        tree.expand(root, &uniform(2), &[true, true]);
        tree.backup(root, 0.5);

        let json = serde_json::to_string(&tree).unwrap();
        let deserialized: MctsTree = serde_json::from_str(&json).unwrap();

        assert_eq!(tree.len(), deserialized.len());
        assert_eq!(tree.root_node().visits, deserialized.root_node().visits);
    }
}
