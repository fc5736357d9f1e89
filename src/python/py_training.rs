//! Training data bindings for Python.

use numpy::{PyArray1, PyArray2, PyArray3, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::nn::BoardEncoder;
use crate::training::GameRecord;

/// Python wrapper for GameRecord.
#[pyclass(name = "GameRecord")]
#[derive(Clone)]
pub struct PyGameRecord(pub GameRecord);

#[pymethods]
impl PyGameRecord {
    /// How the game ended: "continue", "blackwins", "whitewins" or "full".
    #[getter]
    fn result(&self) -> String {
        self.0.result.to_string()
    }

    /// Outcome from black's point of view.
    #[getter]
    fn z(&self) -> f64 {
        self.0.z()
    }

    /// Moves played, as linear indices.
    #[getter]
    fn actions(&self) -> Vec<usize> {
        self.0.steps.iter().map(|s| s.action).collect()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    /// Training arrays `(boards, colors, policies, values)`:
    /// - boards: [n, N, N] int8, the position before each move
    /// - colors: [n] int8, the color to move
    /// - policies: [n, N²] float32
    /// - values: [n] float32, the outcome for the player to move
    #[allow(clippy::type_complexity)]
    fn to_numpy<'py>(
        &self,
        py: Python<'py>,
    ) -> PyResult<(
        Bound<'py, PyArray3<i8>>,
        Bound<'py, PyArray1<i8>>,
        Bound<'py, PyArray2<f32>>,
        Bound<'py, PyArray1<f32>>,
    )> {
        let samples = self.0.to_training_samples();
        let n = samples.len();
        let size = samples.first().map_or(0, |s| s.board.size());

        let mut boards = Vec::with_capacity(n * size * size);
        let mut colors = Vec::with_capacity(n);
        let mut policies = Vec::with_capacity(n * size * size);
        let mut values = Vec::with_capacity(n);
        for sample in &samples {
            boards.extend_from_slice(sample.board.cells());
            colors.push(sample.color.sign());
            policies.extend_from_slice(&sample.policy);
            values.push(sample.value);
        }

        let boards = PyArray1::from_vec_bound(py, boards)
            .reshape([n, size, size])
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let policies = PyArray1::from_vec_bound(py, policies)
            .reshape([n, size * size])
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((
            boards,
            PyArray1::from_vec_bound(py, colors),
            policies,
            PyArray1::from_vec_bound(py, values),
        ))
    }

    /// Network input planes for every recorded position, `[n, 3, N, N]` flattened
    /// to `[n, 3 * N * N]`.
    fn encoded_states<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let encoder = BoardEncoder::new();
        let n = self.0.len();
        let mut width = 0;
        let mut flat = Vec::new();
        for step in &self.0.steps {
            let state = encoder.encode(&step.board, step.color, None);
            width = state.len();
            flat.extend(state.tensor);
        }
        PyArray1::from_vec_bound(py, flat)
            .reshape([n, width])
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __repr__(&self) -> String {
        format!("GameRecord(result={}, steps={})", self.0.result, self.0.len())
    }
}
