//! Core MCTS search algorithm.
//!
//! Each playout walks the tree with PUCT from the root to a leaf, asks the
//! predictor for priors and a value there, expands the leaf (or caches it as
//! terminal), and backs the value up with alternating sign. The root follows
//! the game: it descends into the opponent's move at the start of `act` and,
//! outside self-play, into our own move at the end.

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::core::board::{coordinate_to_index, legality_mask};
use crate::core::{Board, Color, Error, GameRng, Result};
use crate::nn::Predictor;
use crate::rules::Rules;

use super::config::MctsConfig;
use super::node::NodeId;
use super::policy::{argmax, mix_root_noise, visit_distribution, Puct, SelectionPolicy};
use super::stats::SearchStats;
use super::tree::MctsTree;

/// Action chosen by [`MctsSearch::act`] and the distribution it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Linear index of the chosen move.
    pub action: usize,

    /// Temperature-scaled root visit distribution over all `N²` actions.
    /// This is the policy target for training.
    pub distribution: Vec<f64>,
}

/// Main MCTS search context.
///
/// Generic over the predictor. Owns the search tree, configuration and RNG.
pub struct MctsSearch<P: Predictor> {
    /// Policy/value model queried at leaves.
    predictor: P,

    /// Search configuration.
    config: MctsConfig,

    /// Terminal detection rules, derived from the configuration.
    rules: Rules,

    /// Color this engine plays. In self-play the caller flips it every turn.
    color: Color,

    /// The search tree.
    tree: MctsTree,

    /// RNG for root noise and action sampling.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy>,

    /// Statistics of the last `act` call.
    stats: SearchStats,
}

impl<P: Predictor> MctsSearch<P> {
    /// Create a new search for `color`, validating the configuration.
    pub fn new(predictor: P, config: MctsConfig, color: Color) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            predictor,
            rules: config.rules(),
            rng: GameRng::new(config.seed),
            tree: MctsTree::new(Color::Black),
            config,
            color,
            selection: Box::new(Puct),
            stats: SearchStats::default(),
        })
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Discard the tree and start from an empty board with black to move.
    pub fn reset(&mut self) {
        self.tree.reset(Color::Black);
        self.stats.reset();
    }

    /// Decide a move for `board`.
    ///
    /// `last_action` is the opponent's move that produced `board` (`None` at
    /// the start of a game) and `move_number` the number of stones placed so
    /// far. Up to `careful_stage` the move is sampled from the visit
    /// distribution; afterwards the most visited move is played.
    ///
    /// A fresh tree takes the color to move from the stone counts, so an
    /// engine can join a game in progress.
    pub fn act(
        &mut self,
        board: &Board,
        last_action: Option<(usize, usize)>,
        move_number: usize,
    ) -> Result<SearchResult> {
        let size = self.config.board_size;
        let last_index = last_action
            .map(|(row, col)| coordinate_to_index(row, col, size))
            .transpose()?;
        self.act_on_index(board, last_index, move_number)
    }

    /// [`act`](Self::act) with the opponent's move as a linear index.
    pub fn act_on_index(
        &mut self,
        board: &Board,
        last_action: Option<usize>,
        move_number: usize,
    ) -> Result<SearchResult> {
        let area = self.config.action_count();
        if board.area() != area {
            return Err(Error::BoardShape {
                expected: area,
                actual: board.area(),
            });
        }
        if let Some(index) = last_action.filter(|&a| a >= area) {
            return Err(Error::IndexOutOfRange {
                index,
                size: self.config.board_size,
            });
        }
        self.stats.reset();

        // The root still stands for the position before the opponent's move;
        // give it statistics (and children) before descending.
        if self.tree.root_node().is_leaf() {
            let mut previous = board.clone();
            if let Some(action) = last_action {
                previous.remove(action);
            }
            let root = self.tree.root_node_mut();
            if root.visits == 0 && root.action.is_none() {
                root.color = color_to_move(&previous);
            }
            self.simulate(&previous)?;
        }

        if let Some(action) = last_action {
            self.descend(action)?;
        }
        if self.tree.root_node().is_end {
            return Err(Error::GameOver);
        }

        self.simulate(board)?;

        let distribution = self.visit_distribution();
        let action = self.choose_action(&distribution, move_number)?;

        debug!(
            action,
            move_number,
            color = %self.color,
            greedy = move_number > self.config.careful_stage,
            probability = distribution[action],
            root_visits = self.tree.root_node().visits,
            tree_size = self.tree.len(),
            "mcts decision"
        );

        if !self.config.is_self_play {
            self.descend(action)?;
        }

        Ok(SearchResult {
            action,
            distribution,
        })
    }

    /// Run `simulation_count` playouts from the root.
    ///
    /// `root_board` must be the position the root node stands for. This is
    /// not checked: a mismatched board silently corrupts the search.
    pub fn simulate(&mut self, root_board: &Board) -> Result<()> {
        let start = Instant::now();
        let action_count = self.config.action_count();
        let root = self.tree.root();
        let root_legal = legality_mask(root_board);
        debug_assert_eq!(root_legal.len(), action_count);

        for _ in 0..self.config.simulation_count {
            self.noise_root_once(root);

            let mut node = root;
            let mut legal = root_legal.clone();
            let mut board = root_board.clone();
            let mut color = self.tree.get(root).color;
            let mut last_action = None;

            while !self.tree.get(node).is_leaf() {
                let Some((child, action)) =
                    self.selection
                        .select(&self.tree, node, &legal, self.config.c_puct)
                else {
                    break;
                };
                legal[action] = false;
                board.place(action, color);
                color = color.opposite();
                node = child;
                last_action = Some(action);
            }

            self.stats.simulations += 1;

            let leaf = self.tree.get(node);
            if leaf.is_end {
                let value = leaf.value;
                self.tree.backup(node, value);
                self.stats.terminal_hits += 1;
                continue;
            }

            let prediction = self.predictor.predict(&board, color)?;
            prediction.check_shape(action_count)?;
            self.stats.predictor_calls += 1;
            let value = f64::from(prediction.value);

            let outcome = last_action.map(|action| {
                self.rules.check_terminal(&board, action, color.opposite())
            });
            match outcome {
                Some(result) if result.is_decisive() => {
                    // Stored for the player who moved into the position,
                    // the same perspective the backup below uses.
                    self.tree.get_mut(node).mark_terminal(result, -value);
                    self.stats.terminals_found += 1;
                }
                _ => {
                    if !has_legal_mass(&prediction.policy, &legal) {
                        warn!(node = %node, "predictor policy has no mass on legal actions");
                    }
                    let created = self.tree.expand(node, &prediction.policy, &legal);
                    self.stats.nodes_expanded += created as u32;
                }
            }

            self.tree.backup(node, -value);
        }

        self.stats.time_us += start.elapsed().as_micros() as u64;
        trace!(
            simulations = self.stats.simulations,
            predictor_calls = self.stats.predictor_calls,
            terminal_hits = self.stats.terminal_hits,
            nodes = self.tree.len(),
            time_us = self.stats.time_us,
            "simulation batch finished"
        );
        Ok(())
    }

    /// Mix Dirichlet noise into the root priors once the root has children.
    fn noise_root_once(&mut self, root: NodeId) {
        if !self.config.uses_noise() {
            return;
        }
        let node = self.tree.get(root);
        if node.is_leaf() || node.noised {
            return;
        }
        let noise = self.rng.dirichlet(self.config.dirichlet_alpha, node.children.len());
        if noise.is_empty() {
            return;
        }
        debug!(children = noise.len(), epsilon = self.config.epsilon, "mixing root noise");
        mix_root_noise(&mut self.tree, root, self.config.epsilon, &noise);
    }

    /// Move the root to its child for `action`, dropping the siblings.
    fn descend(&mut self, action: usize) -> Result<()> {
        self.tree
            .promote(action)
            .map(|_| ())
            .ok_or(Error::UnknownChild { action })
    }

    /// Root visit distribution at the configured temperature.
    #[must_use]
    pub fn visit_distribution(&self) -> Vec<f64> {
        visit_distribution(&self.tree, self.config.action_count(), self.config.initial_tau)
    }

    /// Pick an action from a distribution: sampled up to `careful_stage`,
    /// the most likely action afterwards.
    ///
    /// Never returns an action with zero probability.
    pub fn choose_action(&mut self, distribution: &[f64], move_number: usize) -> Result<usize> {
        let action = if move_number <= self.config.careful_stage {
            self.rng.choose_weighted(distribution)
        } else {
            argmax(distribution)
        };
        action
            .filter(|&a| distribution[a] > 0.0)
            .ok_or(Error::NoLegalActions)
    }

    /// Color this engine plays.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Change the color this engine plays (self-play flips it every turn).
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Switch self-play mode.
    pub fn set_self_play(&mut self, is_self_play: bool) {
        self.config.is_self_play = is_self_play;
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }

    /// Statistics of the last `act` call (or of all `simulate` calls since).
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Get the predictor.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }
}

/// Black moves whenever both colors have the same number of stones.
fn color_to_move(board: &Board) -> Color {
    let balance: i32 = board.cells().iter().map(|&c| i32::from(c)).sum();
    if balance > 0 {
        Color::White
    } else {
        Color::Black
    }
}

fn has_legal_mass(policy: &[f32], legal: &[bool]) -> bool {
    policy
        .iter()
        .zip(legal)
        .any(|(&p, &ok)| ok && p > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::{FnPredictor, Prediction, UniformPredictor};
    use std::cell::Cell;

    fn config() -> MctsConfig {
        MctsConfig::default()
            .with_board_size(9)
            .with_simulations(40)
            .with_self_play(false)
            .with_seed(11)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = MctsSearch::new(UniformPredictor, config().with_simulations(0), Color::Black);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_simulate_conserves_visits() {
        let mut search = MctsSearch::new(UniformPredictor, config(), Color::Black).unwrap();
        search.simulate(&Board::new(9)).unwrap();

        let tree = search.tree();
        let root = tree.root_node();
        let child_visits: u32 = root.children.iter().map(|e| tree.get(e.child).visits).sum();

        assert_eq!(root.visits, 40);
        assert_eq!(child_visits, 39);
        assert_eq!(root.children.len(), 81);
        assert_eq!(search.stats().simulations, 40);
        assert_eq!(search.stats().predictor_calls, 40);
    }

    #[test]
    fn test_terminal_value_is_cached() {
        // Black to move with four in a row; the predictor points at the fifth.
        let size = 15;
        let mut board = Board::new(size);
        for col in 3..7 {
            board.place(7 * size + col, Color::Black);
        }
        for col in [0, 2, 4, 6] {
            board.place(col, Color::White);
        }
        let winning = 7 * size + 7;

        let calls = Cell::new(0);
        let predictor = FnPredictor::new(|b: &Board, to_move: Color| {
            calls.set(calls.get() + 1);
            let mut policy = vec![0.1 / (b.area() - 1) as f32; b.area()];
            policy[winning] = 0.9;
            let value = if to_move == Color::White { -0.9 } else { 0.0 };
            Ok(Prediction::new(policy, value))
        });
        let config = MctsConfig::default().with_simulations(30).with_self_play(false);
        let mut search = MctsSearch::new(&predictor, config, Color::Black).unwrap();

        search.simulate(&board).unwrap();

        let tree = search.tree();
        let child = tree.get(tree.root_node().child(winning).unwrap());
        assert!(child.is_end);
        assert_eq!(child.end_reason, Some(crate::rules::GameResult::BlackWins));
        assert!((child.value - 0.9).abs() < 1e-6);
        assert!((child.Q() - 0.9).abs() < 1e-6);
        assert_eq!(child.visits, 29);
        assert_eq!(calls.get(), 2);
        assert_eq!(search.stats().terminal_hits, 28);
    }

    #[test]
    fn test_predictor_failure_aborts() {
        let failing = FnPredictor::new(|_: &Board, _: Color| Err(Error::Predictor("boom".into())));
        let mut search = MctsSearch::new(failing, config(), Color::Black).unwrap();

        let result = search.act(&Board::new(9), None, 0);
        assert_eq!(result, Err(Error::Predictor("boom".into())));
    }

    #[test]
    fn test_policy_shape_is_checked() {
        let short = FnPredictor::new(|_: &Board, _: Color| Ok(Prediction::new(vec![1.0; 3], 0.0)));
        let mut search = MctsSearch::new(short, config(), Color::Black).unwrap();

        let result = search.simulate(&Board::new(9));
        assert_eq!(result, Err(Error::PolicyShape { expected: 81, actual: 3 }));
    }

    #[test]
    fn test_act_advances_root_outside_self_play() {
        let mut search = MctsSearch::new(UniformPredictor, config(), Color::Black).unwrap();
        let result = search.act(&Board::new(9), None, 0).unwrap();

        let root = search.tree().root_node();
        assert_eq!(root.action, Some(result.action));
        assert_eq!(root.color, Color::White);
        assert!(root.parent.is_none());
    }

    #[test]
    fn test_act_keeps_root_in_self_play() {
        let config = config().with_self_play(true);
        let mut search = MctsSearch::new(UniformPredictor, config, Color::Black).unwrap();
        search.act(&Board::new(9), None, 0).unwrap();

        let root = search.tree().root_node();
        assert_eq!(root.action, None);
        assert_eq!(root.color, Color::Black);
        assert!(root.noised);
    }

    #[test]
    fn test_act_rejects_wrong_board() {
        let mut search = MctsSearch::new(UniformPredictor, config(), Color::Black).unwrap();
        let result = search.act(&Board::new(15), None, 0);
        assert_eq!(result, Err(Error::BoardShape { expected: 81, actual: 225 }));
    }

    #[test]
    fn test_choose_action_greedy_after_careful_stage() {
        let mut search =
            MctsSearch::new(UniformPredictor, config().with_careful_stage(10), Color::Black).unwrap();
        let pi = [0.1, 0.6, 0.3];

        for _ in 0..20 {
            assert_eq!(search.choose_action(&pi, 11).unwrap(), 1);
        }
        assert_eq!(search.choose_action(&[0.0; 3], 11), Err(Error::NoLegalActions));
        assert_eq!(search.choose_action(&[0.0; 3], 0), Err(Error::NoLegalActions));
    }

    #[test]
    fn test_reset() {
        let mut search = MctsSearch::new(UniformPredictor, config(), Color::White).unwrap();
        search.act(&Board::new(9), None, 0).unwrap();
        assert!(search.tree().len() > 1);

        search.reset();

        assert_eq!(search.tree().len(), 1);
        assert_eq!(search.tree().root_node().color, Color::Black);
        assert_eq!(search.color(), Color::White);
    }
}
