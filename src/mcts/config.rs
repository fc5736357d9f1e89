//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::board::DEFAULT_BOARD_SIZE;
use crate::core::error::{Error, Result};
use crate::rules::engine::{Rules, DEFAULT_FAST_EXIT_STONES, DEFAULT_WIN_LENGTH};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MctsConfig {
    /// PUCT exploration constant.
    /// Higher values trust the prior and under-visited moves more.
    pub c_puct: f64,

    /// Playouts per search batch.
    pub simulation_count: u32,

    /// Temperature for converting visit counts into a distribution.
    /// 1.0 keeps proportions, values near 0 approach greedy.
    pub initial_tau: f64,

    /// Last move number at which actions are sampled.
    /// Later moves take the most visited action.
    pub careful_stage: usize,

    /// Weight of Dirichlet noise mixed into root priors (self-play only).
    pub epsilon: f64,

    /// Concentration of the root Dirichlet noise.
    pub dirichlet_alpha: f64,

    /// Board side length.
    pub board_size: usize,

    /// Self-play mode: one engine plays both colors, the root keeps its full
    /// breadth between calls and root priors receive noise.
    pub is_self_play: bool,

    /// Random seed for noise and action sampling.
    pub seed: u64,

    /// Stone count at or below which terminal checks skip line counting.
    pub fast_exit_stones: usize,

    /// Stones in a row needed to win.
    pub win_length: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            c_puct: 5.0,
            simulation_count: 400,
            initial_tau: 1.0,
            careful_stage: 6,
            epsilon: 0.25,
            dirichlet_alpha: 0.3,
            board_size: DEFAULT_BOARD_SIZE,
            is_self_play: true,
            seed: 42,
            fast_exit_stones: DEFAULT_FAST_EXIT_STONES,
            win_length: DEFAULT_WIN_LENGTH,
        }
    }
}

impl MctsConfig {
    /// Set the PUCT exploration constant.
    pub fn with_c_puct(mut self, c: f64) -> Self {
        self.c_puct = c;
        self
    }

    /// Set the number of playouts per batch.
    pub fn with_simulations(mut self, count: u32) -> Self {
        self.simulation_count = count;
        self
    }

    /// Set the temperature.
    pub fn with_tau(mut self, tau: f64) -> Self {
        self.initial_tau = tau;
        self
    }

    /// Set the move number after which play becomes greedy.
    pub fn with_careful_stage(mut self, stage: usize) -> Self {
        self.careful_stage = stage;
        self
    }

    /// Set root noise weight and concentration.
    pub fn with_noise(mut self, epsilon: f64, alpha: f64) -> Self {
        self.epsilon = epsilon;
        self.dirichlet_alpha = alpha;
        self
    }

    /// Set the board size.
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    /// Switch self-play mode on or off.
    pub fn with_self_play(mut self, is_self_play: bool) -> Self {
        self.is_self_play = is_self_play;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the fast-exit threshold for terminal checks.
    pub fn with_fast_exit_stones(mut self, stones: usize) -> Self {
        self.fast_exit_stones = stones;
        self
    }

    /// Set the win length.
    pub fn with_win_length(mut self, length: usize) -> Self {
        self.win_length = length;
        self
    }

    /// Number of actions (board cells).
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.board_size * self.board_size
    }

    /// Rules implied by this configuration.
    #[must_use]
    pub fn rules(&self) -> Rules {
        Rules::new(self.win_length, self.fast_exit_stones)
    }

    /// Does this configuration mix noise into root priors?
    #[must_use]
    pub fn uses_noise(&self) -> bool {
        self.is_self_play && self.epsilon > 0.0
    }

    /// Reject configurations the search cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 {
            return Err(Error::InvalidConfig("board_size must be positive".into()));
        }
        if self.simulation_count == 0 {
            return Err(Error::InvalidConfig("simulation_count must be positive".into()));
        }
        if !(self.c_puct > 0.0) {
            return Err(Error::InvalidConfig(format!("c_puct must be positive, got {}", self.c_puct)));
        }
        if !(self.initial_tau >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "initial_tau must be non-negative, got {}",
                self.initial_tau
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidConfig(format!("epsilon must be in [0, 1], got {}", self.epsilon)));
        }
        if self.uses_noise() && !(self.dirichlet_alpha > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "dirichlet_alpha must be positive, got {}",
                self.dirichlet_alpha
            )));
        }
        if self.win_length == 0 || self.win_length > self.board_size {
            return Err(Error::InvalidConfig(format!(
                "win_length {} does not fit a {}x{} board",
                self.win_length, self.board_size, self.board_size
            )));
        }
        Ok(())
    }
}
