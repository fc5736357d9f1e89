//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one simulation batch.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Playouts completed.
    pub simulations: u32,

    /// Predictor queries made at leaves.
    pub predictor_calls: u32,

    /// Playouts that ended on an already-known terminal node.
    pub terminal_hits: u32,

    /// Terminal positions discovered.
    pub terminals_found: u32,

    /// Nodes added to the tree.
    pub nodes_expanded: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Calculate simulations per second.
    #[must_use]
    pub fn simulations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.simulations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Fraction of playouts answered from the terminal cache.
    #[must_use]
    pub fn terminal_hit_rate(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.terminal_hits as f64 / self.simulations as f64
        }
    }
}
