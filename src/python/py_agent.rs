//! Search agent bindings for Python.

use numpy::{PyArray1, PyArrayMethods};
use pyo3::prelude::*;

use crate::agent::{Agent, MctsAgent};
use crate::core::{Board, Color, Error, Result};
use crate::mcts::MctsConfig;
use crate::nn::{Prediction, Predictor};
use crate::training::{GameRecord, SelfPlayConfig, SelfPlayWorker};

use super::py_core::{board_from_rows, color_from_int, to_py_err};
use super::py_training::PyGameRecord;

/// Predictor backed by a Python callable.
///
/// The callable receives the board as an `(N, N)` int8 numpy array and the
/// color to move (`1` or `-1`), and returns `(policy, value)` with `N²`
/// policy entries. Any exception it raises aborts the current search.
pub struct PyPredictor {
    callback: PyObject,
}

impl PyPredictor {
    /// Wrap a Python callable.
    pub fn new(callback: PyObject) -> Self {
        Self { callback }
    }
}

impl Predictor for PyPredictor {
    fn predict(&self, board: &Board, to_move: Color) -> Result<Prediction> {
        Python::with_gil(|py| {
            let size = board.size();
            let array = PyArray1::from_slice_bound(py, board.cells())
                .reshape([size, size])
                .map_err(|e| Error::Predictor(e.to_string()))?;
            let output = self
                .callback
                .call1(py, (array, to_move.sign()))
                .map_err(|e| Error::Predictor(e.to_string()))?;
            let (policy, value): (Vec<f32>, f32) = output
                .extract(py)
                .map_err(|e| Error::Predictor(format!("expected (policy, value): {e}")))?;
            Ok(Prediction::new(policy, value))
        })
    }
}

/// Tree-search agent driven by a Python predictor.
#[pyclass(name = "MctsAgent")]
pub struct PyMctsAgent {
    inner: MctsAgent<PyPredictor>,
}

#[pymethods]
impl PyMctsAgent {
    /// Create an agent.
    ///
    /// # Arguments
    /// - predict: callable `(board, color) -> (policy, value)`
    /// - color: 1 for black, -1 for white
    /// - the remaining arguments mirror the search configuration
    #[new]
    #[pyo3(signature = (
        predict,
        color = 1,
        board_size = 15,
        simulation_count = 400,
        c_puct = 5.0,
        initial_tau = 1.0,
        careful_stage = 6,
        epsilon = 0.25,
        dirichlet_alpha = 0.3,
        is_self_play = true,
        seed = 42,
        win_length = 5,
        fast_exit_stones = 8
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        predict: PyObject,
        color: i8,
        board_size: usize,
        simulation_count: u32,
        c_puct: f64,
        initial_tau: f64,
        careful_stage: usize,
        epsilon: f64,
        dirichlet_alpha: f64,
        is_self_play: bool,
        seed: u64,
        win_length: usize,
        fast_exit_stones: usize,
    ) -> PyResult<Self> {
        let config = MctsConfig::default()
            .with_board_size(board_size)
            .with_simulations(simulation_count)
            .with_c_puct(c_puct)
            .with_tau(initial_tau)
            .with_careful_stage(careful_stage)
            .with_noise(epsilon, dirichlet_alpha)
            .with_self_play(is_self_play)
            .with_seed(seed)
            .with_win_length(win_length)
            .with_fast_exit_stones(fast_exit_stones);
        let inner = MctsAgent::new(PyPredictor::new(predict), config, color_from_int(color)?)
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Choose a move.
    ///
    /// Returns `((row, col), pi)` where `pi` is the visit distribution over
    /// all `N²` cells.
    #[pyo3(signature = (board, last_move = None, move_number = 0))]
    fn act(
        &mut self,
        py: Python<'_>,
        board: Vec<Vec<i8>>,
        last_move: Option<(usize, usize)>,
        move_number: usize,
    ) -> PyResult<((usize, usize), Vec<f64>)> {
        let board = board_from_rows(board)?;
        let size = board.size();
        // The predictor re-acquires the GIL for every query.
        let result = py
            .allow_threads(|| self.inner.search_mut().act(&board, last_move, move_number))
            .map_err(to_py_err)?;
        Ok(((result.action / size, result.action % size), result.distribution))
    }

    /// Play one self-play game and return its record.
    fn self_play(&mut self, py: Python<'_>) -> PyResult<PyGameRecord> {
        let config = self.inner.search().config();
        let worker = SelfPlayWorker::new(
            SelfPlayConfig::new()
                .with_board_size(config.board_size)
                .with_rules(config.rules()),
        );
        let mut record = GameRecord::new();
        let inner = &mut self.inner;
        py.allow_threads(|| worker.play_self(inner, Some(&mut record)))
            .map_err(to_py_err)?;
        Ok(PyGameRecord(record))
    }

    /// Drop the search tree.
    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Switch self-play mode.
    fn set_self_play(&mut self, is_self_play: bool) {
        self.inner.set_self_play(is_self_play);
    }

    #[getter]
    fn color(&self) -> i8 {
        self.inner.color().sign()
    }

    #[setter]
    fn set_color(&mut self, color: i8) -> PyResult<()> {
        self.inner.set_color(color_from_int(color)?);
        Ok(())
    }

    /// Number of nodes in the search tree.
    fn tree_size(&self) -> usize {
        self.inner.search().tree().len()
    }

    /// Visits at the root.
    fn root_visits(&self) -> u32 {
        self.inner.search().tree().root_node().visits
    }

    fn __repr__(&self) -> String {
        let config = self.inner.search().config();
        format!(
            "MctsAgent(color={}, board_size={}, simulations={}, self_play={})",
            self.inner.color(),
            config.board_size,
            config.simulation_count,
            config.is_self_play
        )
    }
}
