//! Core types: stones, the board snapshot, coordinates, RNG, and errors.
//!
//! Everything here is independent of the search. The board is a plain N×N
//! grid of `+1` (black), `-1` (white) and `0` (empty) cells addressed either
//! by `(row, col)` or by the row-major index `row * N + col`.

pub mod board;
pub mod error;
pub mod rng;
pub mod stone;

pub use board::{
    coordinate_to_index, index_to_coordinate, legality_mask, Board, DEFAULT_BOARD_SIZE,
};
pub use error::{Error, Result};
pub use rng::GameRng;
pub use stone::{Color, BLACK, EMPTY, WHITE};
