//! Monte Carlo Tree Search guided by a policy/value predictor.
//!
//! ## Overview
//!
//! - **PUCT selection**: children scored by `Q + c * P * sqrt(N) / (1 + n)`
//! - **Predictor-driven evaluation**: no rollouts; leaves are valued by the
//!   predictor, decided positions are cached on their node
//! - **Tree reuse**: the root follows the game, keeping the subtree of the
//!   moves actually played and freeing the rest
//! - **Self-play exploration**: Dirichlet noise at the root, sampled moves
//!   during the opening
//! - **Serializable**: tree and config can be saved/loaded
//!
//! ## Usage
//!
//! ```rust
//! use gomoku_zero::core::{Board, Color};
//! use gomoku_zero::mcts::{MctsConfig, MctsSearch};
//! use gomoku_zero::nn::UniformPredictor;
//!
//! let config = MctsConfig::default()
//!     .with_board_size(9)
//!     .with_simulations(50)
//!     .with_self_play(false);
//! let mut search = MctsSearch::new(UniformPredictor, config, Color::Black).unwrap();
//!
//! let board = Board::new(9);
//! let result = search.act(&board, None, 0).unwrap();
//! assert!(board.is_empty_at(result.action));
//! assert!((result.distribution.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Custom Policies
//!
//! ```rust,ignore
//! use gomoku_zero::mcts::{MctsSearch, MctsConfig, Puct};
//!
//! let search = MctsSearch::new(predictor, config, Color::Black)?
//!     .with_selection(Puct);
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{Edge, MctsNode, NodeId};
pub use policy::{argmax, mix_root_noise, visit_distribution, Puct, SelectionPolicy};
pub use search::{MctsSearch, SearchResult};
pub use stats::SearchStats;
pub use tree::{MctsTree, TreeStats};
