//! Child selection, root noise, and visit-count distributions.
//!
//! - `SelectionPolicy`: how to choose which child to descend into (PUCT)
//! - `mix_root_noise`: Dirichlet exploration at the root in self-play
//! - `visit_distribution`: root visit counts to a temperature-scaled policy

use super::node::NodeId;
use super::tree::MctsTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Pick a child of `node` among actions whose `legal` bit is set.
    ///
    /// Returns the child and its action, or `None` if no child is allowed.
    fn select(
        &self,
        tree: &MctsTree,
        node: NodeId,
        legal: &[bool],
        c_puct: f64,
    ) -> Option<(NodeId, usize)>;
}

/// PUCT selection policy (Predictor + UCB for Trees).
///
/// Uses prior probabilities from the predictor.
/// Formula: Q(a) + c * P(a) * sqrt(N) / (1 + n(a))
///
/// Ties go to the lowest action index.
#[derive(Clone, Debug, Default)]
pub struct Puct;

impl Puct {
    /// PUCT score of one child.
    #[inline]
    #[must_use]
    pub fn score(q: f64, prior: f32, sqrt_parent: f64, child_visits: u32, c_puct: f64) -> f64 {
        q + c_puct * f64::from(prior) * sqrt_parent / (1.0 + f64::from(child_visits))
    }
}

impl SelectionPolicy for Puct {
    fn select(
        &self,
        tree: &MctsTree,
        node: NodeId,
        legal: &[bool],
        c_puct: f64,
    ) -> Option<(NodeId, usize)> {
        let parent = tree.get(node);
        let sqrt_parent = f64::from(parent.visits).sqrt();

        let mut best: Option<(NodeId, usize, f64)> = None;
        for edge in &parent.children {
            if !legal.get(edge.action).copied().unwrap_or(false) {
                continue;
            }
            let child = tree.get(edge.child);
            let score = Self::score(child.Q(), child.prior, sqrt_parent, child.visits, c_puct);
            if best.map_or(true, |(_, _, s)| score > s) {
                best = Some((edge.child, edge.action, score));
            }
        }

        best.map(|(child, action, _)| (child, action))
    }
}

// =============================================================================
// Root Noise
// =============================================================================

/// Mix noise into the priors of `node`'s children:
/// `prior' = (1 - epsilon) * prior + epsilon * noise[i]`, children in action order.
///
/// Marks the node so the same root is not noised twice.
pub fn mix_root_noise(tree: &mut MctsTree, node: NodeId, epsilon: f64, noise: &[f64]) {
    let children: Vec<NodeId> = tree.get(node).children.iter().map(|e| e.child).collect();
    debug_assert_eq!(children.len(), noise.len());

    for (child, &eta) in children.into_iter().zip(noise) {
        let prior = &mut tree.get_mut(child).prior;
        *prior = ((1.0 - epsilon) * f64::from(*prior) + epsilon * eta) as f32;
    }
    tree.get_mut(node).noised = true;
}

// =============================================================================
// Visit Distribution
// =============================================================================

/// Convert root child visit counts into a distribution over all actions.
///
/// `pi[a] = N(a)^(1/tau) / sum_b N(b)^(1/tau)` over the root's children;
/// actions without a child get 0. `tau == 0` puts all mass on the most
/// visited child (lowest action on ties). Returns all zeros if no child has
/// been visited.
pub fn visit_distribution(tree: &MctsTree, action_count: usize, tau: f64) -> Vec<f64> {
    let mut pi = vec![0.0; action_count];
    let root = tree.root_node();

    let max_visits = root
        .children
        .iter()
        .map(|e| tree.get(e.child).visits)
        .max()
        .unwrap_or(0);
    if max_visits == 0 {
        return pi;
    }

    if tau <= 0.0 {
        if let Some(edge) = root
            .children
            .iter()
            .find(|e| tree.get(e.child).visits == max_visits)
        {
            pi[edge.action] = 1.0;
        }
        return pi;
    }

    // Scale by the maximum first so large counts and small tau don't overflow.
    let inv_tau = 1.0 / tau;
    let mut total = 0.0;
    for edge in &root.children {
        let visits = tree.get(edge.child).visits;
        let weight = (f64::from(visits) / f64::from(max_visits)).powf(inv_tau);
        pi[edge.action] = weight;
        total += weight;
    }
    for p in &mut pi {
        *p /= total;
    }
    pi
}

/// Index of the largest entry, lowest index on ties.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Color;

    /// Root with three children at actions 0, 1, 2 and the given stats.
    fn make_tree(stats: &[(u32, f64, f32)]) -> MctsTree {
        let mut tree = MctsTree::new(Color::Black);
        let root = tree.root();
        let priors: Vec<f32> = stats.iter().map(|s| s.2).collect();
        tree.expand(root, &priors, &vec![true; stats.len()]);

        let mut total = 0;
        for (action, &(visits, w, _)) in stats.iter().enumerate() {
            let child = tree.root_node().child(action).unwrap();
            let node = tree.get_mut(child);
            node.visits = visits;
            node.total_value = w;
            node.mean_value = if visits == 0 { 0.0 } else { w / f64::from(visits) };
            total += visits;
        }
        tree.root_node_mut().visits = total + 1;
        tree
    }

    #[test]
    fn test_puct_uses_prior() {
        let tree = make_tree(&[(10, 5.0, 0.1), (10, 5.0, 0.9)]);
        let (_, action) = Puct.select(&tree, tree.root(), &[true, true], 1.0).unwrap();
        assert_eq!(action, 1);
    }

    #[test]
    fn test_puct_prefers_value_when_priors_equal() {
        let tree = make_tree(&[(10, -5.0, 0.5), (10, 5.0, 0.5)]);
        let (_, action) = Puct.select(&tree, tree.root(), &[true, true], 1.0).unwrap();
        assert_eq!(action, 1);
    }

    #[test]
    fn test_puct_explores_unvisited() {
        // Equal priors: the unvisited child has the larger bonus.
        let tree = make_tree(&[(50, 0.0, 0.5), (0, 0.0, 0.5)]);
        let (_, action) = Puct.select(&tree, tree.root(), &[true, true], 1.0).unwrap();
        assert_eq!(action, 1);
    }

    #[test]
    fn test_puct_respects_mask() {
        let tree = make_tree(&[(1, 0.0, 0.1), (1, 0.0, 0.8), (1, 0.0, 0.1)]);
        let (child, action) = Puct.select(&tree, tree.root(), &[true, false, true], 1.0).unwrap();
        assert_eq!(action, 0);
        assert_eq!(tree.get(child).action, Some(0));

        assert!(Puct.select(&tree, tree.root(), &[false, false, false], 1.0).is_none());
    }

    #[test]
    fn test_puct_tie_goes_to_lowest_action() {
        let tree = make_tree(&[(0, 0.0, 0.5), (0, 0.0, 0.5)]);
        let (_, action) = Puct.select(&tree, tree.root(), &[true, true], 1.0).unwrap();
        assert_eq!(action, 0);
    }

    #[test]
    fn test_mix_root_noise() {
        let mut tree = make_tree(&[(0, 0.0, 1.0), (0, 0.0, 0.0)]);
        let root = tree.root();

        mix_root_noise(&mut tree, root, 0.25, &[0.0, 1.0]);

        let p0 = tree.get(tree.root_node().child(0).unwrap()).prior;
        let p1 = tree.get(tree.root_node().child(1).unwrap()).prior;
        assert!((p0 - 0.75).abs() < 1e-6);
        assert!((p1 - 0.25).abs() < 1e-6);
        assert!(tree.root_node().noised);
    }

    #[test]
    fn test_visit_distribution_tau_one() {
        let tree = make_tree(&[(1, 0.0, 0.3), (3, 0.0, 0.3), (0, 0.0, 0.4)]);
        let pi = visit_distribution(&tree, 5, 1.0);

        assert_eq!(pi.len(), 5);
        assert!((pi[0] - 0.25).abs() < 1e-12);
        assert!((pi[1] - 0.75).abs() < 1e-12);
        assert_eq!(pi[2], 0.0);
        assert_eq!(pi[4], 0.0);
    }

    #[test]
    fn test_visit_distribution_sharpens() {
        let tree = make_tree(&[(1, 0.0, 0.5), (2, 0.0, 0.5)]);
        let pi = visit_distribution(&tree, 2, 0.5);
        // 1^2 : 2^2
        assert!((pi[0] - 0.2).abs() < 1e-12);
        assert!((pi[1] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_visit_distribution_greedy() {
        let tree = make_tree(&[(4, 0.0, 0.5), (4, 0.0, 0.5), (1, 0.0, 0.0)]);
        let pi = visit_distribution(&tree, 3, 0.0);
        assert_eq!(pi, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_visit_distribution_handles_large_counts() {
        let tree = make_tree(&[(100_000, 0.0, 0.5), (50_000, 0.0, 0.5)]);
        let pi = visit_distribution(&tree, 2, 0.01);
        assert!(pi.iter().all(|p| p.is_finite()));
        assert!((pi.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_visit_distribution_unvisited() {
        let tree = MctsTree::new(Color::Black);
        assert_eq!(visit_distribution(&tree, 3, 1.0), vec![0.0; 3]);
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5, 0.2]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
