//! Python bindings for the gomoku engine.
//!
//! # Quick Start
//!
//! ```python
//! import numpy as np
//! import gomoku_zero as gz
//!
//! def predict(board, color):
//!     n = board.shape[0]
//!     return np.full(n * n, 1.0 / (n * n)), 0.0
//!
//! agent = gz.MctsAgent(predict, board_size=15, simulation_count=200)
//! record = agent.self_play()
//! boards, colors, policies, values = record.to_numpy()
//! ```

use pyo3::prelude::*;

mod py_agent;
mod py_core;
mod py_training;

pub use py_agent::*;
pub use py_core::*;
pub use py_training::*;

/// gomoku_zero: tree search and self-play for five-in-a-row.
#[pymodule]
fn gomoku_zero(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMctsAgent>()?;
    m.add_class::<PyGameRecord>()?;

    m.add_function(wrap_pyfunction!(check_terminal, m)?)?;
    m.add_function(wrap_pyfunction!(legality_mask, m)?)?;
    m.add_function(wrap_pyfunction!(index_to_coordinate, m)?)?;
    m.add_function(wrap_pyfunction!(coordinate_to_index, m)?)?;

    Ok(())
}
