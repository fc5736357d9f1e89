//! Stone colors and cell values.
//!
//! Cells are stored as `i8` so a board snapshot can be handed to a predictor
//! as a plain grid of `{-1, 0, 1}`.

use serde::{Deserialize, Serialize};

/// An empty cell.
pub const EMPTY: i8 = 0;

/// A black stone. Black moves first.
pub const BLACK: i8 = 1;

/// A white stone.
pub const WHITE: i8 = -1;

/// A player color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other player.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Cell value of this color's stones (+1 for black, -1 for white).
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Color::Black => BLACK,
            Color::White => WHITE,
        }
    }

    /// Color of a cell value, `None` for empty (or any unknown value).
    #[inline]
    #[must_use]
    pub const fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            BLACK => Some(Color::Black),
            WHITE => Some(Color::White),
            _ => None,
        }
    }
}

impl std::ops::Neg for Color {
    type Output = Color;

    fn neg(self) -> Color {
        self.opposite()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}
