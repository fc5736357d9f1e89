//! Training data generation.
//!
//! This module plays games and turns them into training data for an
//! external policy/value network in an AlphaZero-style loop.
//!
//! ## Overview
//!
//! - **GameRecord**: one game's decision points and its result
//! - **ExperienceBuffer**: collects records and samples training batches
//! - **SelfPlayWorker**: runs games between agents, or one agent against itself
//!
//! ## Usage
//!
//! ```rust
//! use gomoku_zero::agent::MctsAgent;
//! use gomoku_zero::core::Color;
//! use gomoku_zero::mcts::MctsConfig;
//! use gomoku_zero::nn::UniformPredictor;
//! use gomoku_zero::rules::Rules;
//! use gomoku_zero::training::{ExperienceBuffer, SelfPlayConfig, SelfPlayWorker};
//!
//! let mcts = MctsConfig::default()
//!     .with_board_size(5)
//!     .with_win_length(4)
//!     .with_fast_exit_stones(6)
//!     .with_simulations(8);
//! let mut agent = MctsAgent::new(UniformPredictor, mcts, Color::Black).unwrap();
//!
//! let worker = SelfPlayWorker::new(
//!     SelfPlayConfig::new().with_board_size(5).with_rules(Rules::new(4, 6)),
//! );
//! let mut buffer = ExperienceBuffer::new(100);
//! worker.generate(&mut agent, 2, &mut buffer).unwrap();
//!
//! let batch = buffer.sample_batch(8, 0);
//! assert!(!batch.is_empty());
//! ```

pub mod self_play;
pub mod trajectory;

// Re-export main types
pub use self_play::{SelfPlayConfig, SelfPlayWorker};
pub use trajectory::{ExperienceBuffer, GameRecord, RecordStep, TrainingSample};
