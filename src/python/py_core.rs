//! Board, rules and error bindings for Python.

use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::core::{self, Board, Color, Error};
use crate::rules::Rules;

/// Convert an engine error into a Python exception.
pub(crate) fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::OutOfBoard { .. } | Error::IndexOutOfRange { .. } => PyIndexError::new_err(err.to_string()),
        Error::Predictor(_) | Error::UnknownChild { .. } | Error::NoLegalActions => {
            PyRuntimeError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Read a board from nested rows (lists or a 2-D numpy array).
pub(crate) fn board_from_rows(rows: Vec<Vec<i8>>) -> PyResult<Board> {
    Board::from_rows(&rows).map_err(to_py_err)
}

/// Read a color given as `1` (black) or `-1` (white).
pub(crate) fn color_from_int(color: i8) -> PyResult<Color> {
    Color::from_sign(color)
        .ok_or_else(|| PyValueError::new_err(format!("color must be 1 or -1, got {color}")))
}

/// Check a position after `color` placed a stone at `(row, col)`.
///
/// Returns one of "continue", "blackwins", "whitewins" or "full".
#[pyfunction]
#[pyo3(signature = (board, row, col, color, win_length = 5, fast_exit_stones = 8))]
pub fn check_terminal(
    board: Vec<Vec<i8>>,
    row: usize,
    col: usize,
    color: i8,
    win_length: usize,
    fast_exit_stones: usize,
) -> PyResult<String> {
    let board = board_from_rows(board)?;
    let color = color_from_int(color)?;
    let action = core::coordinate_to_index(row, col, board.size()).map_err(to_py_err)?;
    if board.cell(action) != color.sign() {
        return Err(PyValueError::new_err(format!(
            "cell ({row}, {col}) does not hold a stone of color {}",
            color.sign()
        )));
    }
    let rules = Rules::new(win_length, fast_exit_stones);
    Ok(rules.check_terminal(&board, action, color).to_string())
}

/// Flat list with `True` on empty cells, row-major.
#[pyfunction]
pub fn legality_mask(board: Vec<Vec<i8>>) -> PyResult<Vec<bool>> {
    let board = board_from_rows(board)?;
    Ok(core::legality_mask(&board))
}

/// Convert a linear index to `(row, col)`.
#[pyfunction]
#[pyo3(signature = (index, size = 15))]
pub fn index_to_coordinate(index: usize, size: usize) -> PyResult<(usize, usize)> {
    core::index_to_coordinate(index, size).map_err(to_py_err)
}

/// Convert `(row, col)` to a linear index.
#[pyfunction]
#[pyo3(signature = (row, col, size = 15))]
pub fn coordinate_to_index(row: usize, col: usize, size: usize) -> PyResult<usize> {
    core::coordinate_to_index(row, col, size).map_err(to_py_err)
}
