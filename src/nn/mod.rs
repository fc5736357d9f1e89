//! Neural network integration.
//!
//! The search never owns a network. It talks to one through the
//! [`Predictor`] trait, which maps a board and the color to move to action
//! priors and a value estimate.
//!
//! ## Overview
//!
//! - **Traits**: `Predictor`, `Prediction`
//! - **Baselines**: `UniformPredictor` for testing, `FnPredictor` for closures
//! - **Encoding**: `BoardEncoder` feature planes for an external model
//!
//! ## Usage
//!
//! ```rust
//! use gomoku_zero::core::{Board, Color};
//! use gomoku_zero::nn::{BoardEncoder, Predictor, UniformPredictor};
//!
//! let board = Board::new(15);
//! let planes = BoardEncoder::new().encode(&board, Color::Black, None);
//! assert_eq!(planes.shape, vec![3, 15, 15]);
//!
//! let prediction = UniformPredictor.predict(&board, Color::Black).unwrap();
//! assert_eq!(prediction.policy.len(), 225);
//! ```

pub mod encoder;
pub mod traits;

pub use encoder::{BoardEncoder, EncodedState};
pub use traits::{FnPredictor, Prediction, Predictor, UniformPredictor};
