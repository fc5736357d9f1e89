//! Error type shared by the rules, search and environment layers.

use thiserror::Error;

/// Errors produced by the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("coordinate ({row}, {col}) is outside a {size}x{size} board")]
    OutOfBoard { row: usize, col: usize, size: usize },

    #[error("index {index} is outside a {size}x{size} board")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("the game is already over")]
    GameOver,

    #[error("predictor failed: {0}")]
    Predictor(String),

    #[error("predictor returned a policy of length {actual}, expected {expected}")]
    PolicyShape { expected: usize, actual: usize },

    #[error("root has no child for action {action}")]
    UnknownChild { action: usize },

    #[error("no legal actions at the root")]
    NoLegalActions,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("board has {actual} cells, expected {expected}")]
    BoardShape { expected: usize, actual: usize },

    #[error("{black} black and {white} white stones cannot arise from alternating play")]
    IllegalPosition { black: usize, white: usize },
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
