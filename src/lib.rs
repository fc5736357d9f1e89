//! # gomoku-zero
//!
//! AlphaZero-style tree search for five-in-a-row.
//!
//! ## Design Principles
//!
//! 1. **Predictor-Agnostic**: The search talks to a policy/value model only
//!    through the `Predictor` trait. No network lives in this crate.
//!
//! 2. **Snapshots In, Decisions Out**: Agents receive a board snapshot and
//!    the last move, and return a move plus the visit distribution behind it.
//!    The search never mutates the caller's board.
//!
//! 3. **Deterministic**: All randomness flows through a seeded `GameRng`.
//!
//! ## Architecture
//!
//! - **Arena Tree**: Nodes live in a flat vector addressed by `NodeId`.
//!   Moving the root compacts the arena to the retained subtree.
//!
//! - **Cheap Terminal Checks**: Only the four lines through the last move are
//!   scanned, and not at all while too few stones are on the board to win.
//!
//! ## Modules
//!
//! - `core`: Board, colors, coordinates, RNG, errors
//! - `rules`: Terminal detection
//! - `mcts`: Tree, selection, search
//! - `nn`: Predictor trait and board encoding
//! - `agent`: Search, random and scripted players
//! - `env`: Headless game state
//! - `training`: Self-play and training records
//! - `python`: PyO3 bindings (feature `python`)

pub mod agent;
pub mod core;
pub mod env;
pub mod mcts;
pub mod nn;
pub mod rules;
pub mod training;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    coordinate_to_index, index_to_coordinate, legality_mask, Board, Color, Error, GameRng, Result,
};

pub use crate::rules::{check_terminal, GameResult, Rules};

pub use crate::mcts::{MctsConfig, MctsNode, MctsSearch, MctsTree, NodeId, SearchResult, SearchStats};

pub use crate::nn::{Prediction, Predictor, UniformPredictor};

pub use crate::agent::{Agent, AgentMove, MctsAgent, RandomAgent, ScriptedAgent};

pub use crate::env::Game;

pub use crate::training::{ExperienceBuffer, GameRecord, SelfPlayConfig, SelfPlayWorker, TrainingSample};
