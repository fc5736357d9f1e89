//! Predictor interface between the search and a policy/value model.
//!
//! The search treats the model as an opaque function
//! `predict(board, color_to_move) -> (policy, value)`. Implementations live
//! outside this crate (a network behind Python bindings, a remote service);
//! the baselines here are for testing and benchmarking.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{Board, Color, Error, Result};

/// Output of one predictor query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Prior over all `N²` actions, row-major, summing to about 1.
    pub policy: Vec<f32>,

    /// Expected outcome in [-1, 1] for the player to move.
    pub value: f32,
}

impl Prediction {
    /// Create a new prediction.
    pub fn new(policy: Vec<f32>, value: f32) -> Self {
        Self { policy, value }
    }

    /// Check that the policy covers the action space.
    pub fn check_shape(&self, action_count: usize) -> Result<()> {
        if self.policy.len() != action_count {
            return Err(Error::PolicyShape {
                expected: action_count,
                actual: self.policy.len(),
            });
        }
        Ok(())
    }
}

/// Policy/value predictor.
///
/// Any error is fatal to the simulation batch that issued the query.
pub trait Predictor {
    /// Predict action priors and a value for `board` with `to_move` to play.
    fn predict(&self, board: &Board, to_move: Color) -> Result<Prediction>;
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, board: &Board, to_move: Color) -> Result<Prediction> {
        (**self).predict(board, to_move)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, board: &Board, to_move: Color) -> Result<Prediction> {
        (**self).predict(board, to_move)
    }
}

impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn predict(&self, board: &Board, to_move: Color) -> Result<Prediction> {
        (**self).predict(board, to_move)
    }
}

/// Uniform policy and zero value (baseline for testing).
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformPredictor;

impl Predictor for UniformPredictor {
    fn predict(&self, board: &Board, _to_move: Color) -> Result<Prediction> {
        let n = board.area();
        let policy = if n == 0 { Vec::new() } else { vec![1.0 / n as f32; n] };
        Ok(Prediction::new(policy, 0.0))
    }
}

/// Predictor backed by a closure.
///
/// ```
/// use gomoku_zero::core::{Board, Color};
/// use gomoku_zero::nn::{FnPredictor, Prediction, Predictor};
///
/// let center_lover = FnPredictor::new(|board: &Board, _color: Color| {
///     let mut policy = vec![0.0; board.area()];
///     policy[board.area() / 2] = 1.0;
///     Ok(Prediction::new(policy, 0.0))
/// });
/// let prediction = center_lover.predict(&Board::new(3), Color::Black).unwrap();
/// assert_eq!(prediction.policy[4], 1.0);
/// ```
pub struct FnPredictor<F> {
    f: F,
}

impl<F> FnPredictor<F>
where
    F: Fn(&Board, Color) -> Result<Prediction>,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&Board, Color) -> Result<Prediction>,
{
    fn predict(&self, board: &Board, to_move: Color) -> Result<Prediction> {
        (self.f)(board, to_move)
    }
}

impl<F> std::fmt::Debug for FnPredictor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPredictor").finish_non_exhaustive()
    }
}
