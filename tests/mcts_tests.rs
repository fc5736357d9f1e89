//! MCTS integration tests.

use std::cell::Cell;

use gomoku_zero::core::{Board, Color, Error};
use gomoku_zero::mcts::{argmax, MctsConfig, MctsSearch, MctsTree, NodeId};
use gomoku_zero::nn::{FnPredictor, Prediction, UniformPredictor};

fn small_config() -> MctsConfig {
    MctsConfig::default()
        .with_board_size(9)
        .with_simulations(64)
        .with_seed(7)
}

/// Every expanded node was visited once itself, then once per playout that
/// went on into one of its children.
fn assert_visits_conserved(tree: &MctsTree) {
    for (id, node) in tree.iter() {
        if node.is_leaf() {
            continue;
        }
        let child_visits: u32 = node.children.iter().map(|e| tree.get(e.child).visits).sum();
        assert_eq!(node.visits, child_visits + 1, "at {id}");
    }
}

// =============================================================================
// Statistics
// =============================================================================

#[test]
fn test_visit_count_conservation() {
    let config = MctsConfig::default().with_simulations(100).with_self_play(false);
    let mut search = MctsSearch::new(UniformPredictor, config, Color::Black).unwrap();

    search.simulate(&Board::new(15)).unwrap();

    let tree = search.tree();
    let root = tree.root_node();
    let child_visits: u32 = root.children.iter().map(|e| tree.get(e.child).visits).sum();
    assert_eq!(root.visits, 100);
    assert_eq!(child_visits, 99);
    assert_visits_conserved(tree);
}

#[test]
fn test_visit_conservation_with_noise() {
    let mut search = MctsSearch::new(UniformPredictor, small_config(), Color::Black).unwrap();

    search.simulate(&Board::new(9)).unwrap();

    assert!(search.tree().root_node().noised);
    assert_visits_conserved(search.tree());
}

#[test]
fn test_distribution_is_valid() {
    let mut board = Board::new(9);
    board.place(40, Color::Black);
    board.place(41, Color::White);
    board.place(31, Color::Black);

    let config = small_config().with_self_play(false);
    let mut search = MctsSearch::new(UniformPredictor, config, Color::White).unwrap();
    let result = search.act(&board, Some((3, 4)), 3).unwrap();
    let pi = &result.distribution;

    assert_eq!(pi.len(), 81);
    assert!(pi.iter().all(|&p| p >= 0.0));
    assert!((pi.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    for occupied in [40, 41, 31] {
        assert_eq!(pi[occupied], 0.0);
    }
    assert!(board.is_empty_at(result.action));
    assert!(pi[result.action] > 0.0);
}

// =============================================================================
// Action Choice
// =============================================================================

#[test]
fn test_greedy_after_careful_stage() {
    let config = small_config().with_careful_stage(10).with_self_play(true);

    for seed in 0..5 {
        let mut search =
            MctsSearch::new(UniformPredictor, config.clone().with_seed(seed), Color::Black).unwrap();
        let result = search.act(&Board::new(9), None, 11).unwrap();
        assert_eq!(Some(result.action), argmax(&result.distribution));
    }
}

#[test]
fn test_sampling_follows_distribution() {
    let config = small_config().with_careful_stage(10);
    let mut search = MctsSearch::new(UniformPredictor, config, Color::Black).unwrap();

    let mut pi = vec![0.0; 81];
    pi[10] = 0.5;
    pi[20] = 0.3;
    pi[30] = 0.2;

    let trials = 20_000;
    let mut counts = vec![0usize; 81];
    for _ in 0..trials {
        counts[search.choose_action(&pi, 5).unwrap()] += 1;
    }

    for (action, &count) in counts.iter().enumerate() {
        let freq = count as f64 / trials as f64;
        if pi[action] == 0.0 {
            assert_eq!(count, 0, "sampled impossible action {action}");
        } else {
            assert!((freq - pi[action]).abs() < 0.02, "action {action}: {freq} vs {}", pi[action]);
        }
    }
}

// =============================================================================
// Root Management
// =============================================================================

#[test]
fn test_root_advance_discards_siblings() {
    let config = small_config().with_self_play(false);
    let mut search = MctsSearch::new(UniformPredictor, config, Color::Black).unwrap();
    let board = Board::new(9);
    search.simulate(&board).unwrap();

    let chosen = 40;
    let before = search.tree().clone();
    let kept = before.subtree_size(before.root_node().child(chosen).unwrap());
    assert!(kept < before.len());

    let mut tree = before;
    tree.promote(chosen).unwrap();

    assert_eq!(tree.len(), kept);
    let reachable = tree.reachable();
    assert_eq!(reachable.len(), tree.len());
    for (id, node) in tree.iter() {
        assert!(reachable.contains(&id));
        if id != tree.root() {
            assert!(reachable.contains(&node.parent));
        }
        for edge in &node.children {
            assert!(edge.child.raw() < tree.len() as u32);
        }
    }
    assert!(tree.root_node().parent.is_none());
    assert_eq!(tree.root_node().action, Some(chosen));
}

#[test]
fn test_non_self_play_advances_past_own_move() {
    let config = small_config().with_self_play(false);
    let mut search = MctsSearch::new(UniformPredictor, config, Color::Black).unwrap();

    let result = search.act(&Board::new(9), None, 0).unwrap();

    let tree = search.tree();
    assert_eq!(tree.root_node().action, Some(result.action));
    assert_eq!(tree.reachable().len(), tree.len());
    assert_eq!(tree.root(), NodeId::new(0));
}

#[test]
fn test_two_engines_reuse_their_trees() {
    let config = small_config().with_self_play(false);
    let mut black = MctsSearch::new(UniformPredictor, config.clone(), Color::Black).unwrap();
    let mut white = MctsSearch::new(UniformPredictor, config.with_seed(8), Color::White).unwrap();
    let mut board = Board::new(9);

    let b1 = black.act(&board, None, 0).unwrap().action;
    board.place(b1, Color::Black);

    let w1 = white.act(&board, Some((b1 / 9, b1 % 9)), 1).unwrap().action;
    board.place(w1, Color::White);
    assert_eq!(white.tree().root_node().color, Color::Black);

    let b2 = black.act(&board, Some((w1 / 9, w1 % 9)), 2).unwrap().action;
    assert!(board.is_empty_at(b2));
    assert_eq!(black.tree().root_node().action, Some(b2));
    assert_eq!(black.tree().root_node().color, Color::White);
}

#[test]
fn test_self_play_follows_both_sides() {
    let config = small_config().with_self_play(true);
    let mut search = MctsSearch::new(UniformPredictor, config, Color::Black).unwrap();
    let mut board = Board::new(9);
    let mut last = None;

    for move_number in 0..4 {
        let color = if move_number % 2 == 0 { Color::Black } else { Color::White };
        search.set_color(color);
        let result = search.act(&board, last, move_number).unwrap();

        // The root stays on the searched position until the next call.
        let root = search.tree().root_node();
        assert_eq!(root.color, color);
        assert_eq!(root.action, last.map(|(row, col)| row * 9 + col));
        assert!(root.visits >= 64);

        board.place(result.action, color);
        last = Some((result.action / 9, result.action % 9));
    }
}

#[test]
fn test_engine_joins_game_in_progress() {
    let mut board = Board::new(9);
    board.place(40, Color::Black);

    let config = small_config().with_self_play(false);
    let mut search = MctsSearch::new(UniformPredictor, config, Color::White).unwrap();

    // No last move: the fresh root must take white to move from the board.
    let result = search.act(&board, None, 1).unwrap();

    assert_ne!(result.action, 40);
    assert_eq!(search.tree().root_node().color, Color::Black);
}

#[test]
fn test_last_move_off_board_is_rejected() {
    let config = small_config().with_self_play(false);
    let mut search = MctsSearch::new(UniformPredictor, config, Color::Black).unwrap();

    let result = search.act(&Board::new(9), Some((9, 0)), 1);
    assert_eq!(result, Err(Error::OutOfBoard { row: 9, col: 0, size: 9 }));
}

// =============================================================================
// Failures and Determinism
// =============================================================================

#[test]
fn test_predictor_failure_propagates() {
    let calls = Cell::new(0);
    let flaky = FnPredictor::new(|board: &Board, _: Color| {
        calls.set(calls.get() + 1);
        if calls.get() > 10 {
            return Err(Error::Predictor("device lost".into()));
        }
        Ok(Prediction::new(vec![1.0 / board.area() as f32; board.area()], 0.0))
    });
    let mut search = MctsSearch::new(&flaky, small_config(), Color::Black).unwrap();

    let result = search.act(&Board::new(9), None, 0);

    assert_eq!(result, Err(Error::Predictor("device lost".into())));
    assert_eq!(calls.get(), 11);
}

#[test]
fn test_deterministic_with_seed() {
    let run = || {
        let mut search = MctsSearch::new(UniformPredictor, small_config(), Color::Black).unwrap();
        let mut board = Board::new(9);
        let mut last = None;
        let mut moves = Vec::new();
        for move_number in 0..3 {
            let color = if move_number % 2 == 0 { Color::Black } else { Color::White };
            search.set_color(color);
            let result = search.act(&board, last, move_number).unwrap();
            board.place(result.action, color);
            last = Some((result.action / 9, result.action % 9));
            moves.push((result.action, result.distribution));
        }
        moves
    };

    assert_eq!(run(), run());
}
