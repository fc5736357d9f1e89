//! Board encoding for neural network input.
//!
//! Transforms a board snapshot into feature planes suitable for a
//! convolutional policy/value network.

use serde::{Deserialize, Serialize};

use crate::core::{Board, Color};

/// Encoded board as a flat tensor for neural network input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor, `[channels, height, width]`.
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Create a zero-filled encoded state with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    /// Get the total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    /// Check if the tensor is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Encodes a board from the perspective of the player to move.
///
/// Planes:
/// 0. stones of the player to move
/// 1. stones of the opponent
/// 2. all ones if black is to move, all zeros otherwise
/// 3. the last move (optional)
#[derive(Clone, Copy, Debug, Default)]
pub struct BoardEncoder {
    last_move_plane: bool,
}

impl BoardEncoder {
    /// Create an encoder with the three stone/color planes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plane marking the last move.
    pub fn with_last_move_plane(mut self) -> Self {
        self.last_move_plane = true;
        self
    }

    /// Number of planes produced.
    #[must_use]
    pub fn channels(&self) -> usize {
        if self.last_move_plane {
            4
        } else {
            3
        }
    }

    /// Shape of encoded boards of side `size`.
    #[must_use]
    pub fn output_shape(&self, size: usize) -> Vec<usize> {
        vec![self.channels(), size, size]
    }

    /// Encode `board` for `to_move`. `last_move` is only used with the
    /// last-move plane.
    pub fn encode(&self, board: &Board, to_move: Color, last_move: Option<usize>) -> EncodedState {
        let area = board.area();
        let mut state = EncodedState::zeros(self.output_shape(board.size()));
        let (own, opponent) = (to_move.sign(), to_move.opposite().sign());

        for (i, &cell) in board.cells().iter().enumerate() {
            if cell == own {
                state.tensor[i] = 1.0;
            } else if cell == opponent {
                state.tensor[area + i] = 1.0;
            }
        }

        if to_move == Color::Black {
            state.tensor[2 * area..3 * area].fill(1.0);
        }

        if self.last_move_plane {
            if let Some(action) = last_move.filter(|&a| a < area) {
                state.tensor[3 * area + action] = 1.0;
            }
        }

        state
    }
}
