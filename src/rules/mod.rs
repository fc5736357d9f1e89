//! Five-in-a-row rules.
//!
//! Terminal detection only ever looks at the lines through the last move, so
//! a check costs a few dozen cell reads regardless of board size.

pub mod engine;

pub use engine::{
    check_terminal, GameResult, LineCounter, Rules, StoneLineCounter, AXES,
    DEFAULT_FAST_EXIT_STONES, DEFAULT_WIN_LENGTH,
};
