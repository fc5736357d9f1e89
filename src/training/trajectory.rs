//! Game records and the experience buffer.
//!
//! A game record captures one self-play game:
//! - the board at each decision point, before the move
//! - the color that moved and the move it made
//! - the search's visit distribution (the policy target)
//! - the final result, which provides the value target `z`

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{Board, Color, GameRng};
use crate::rules::GameResult;

/// One decision point of a recorded game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordStep {
    /// Position the mover faced.
    pub board: Board,

    /// Color to move.
    pub color: Color,

    /// Visit distribution over all actions.
    pub distribution: Vec<f64>,

    /// The move actually played.
    pub action: usize,

    /// Stones on the board before the move.
    pub move_number: usize,
}

impl RecordStep {
    /// Probability the distribution gave to the move played.
    #[must_use]
    pub fn action_probability(&self) -> f64 {
        self.distribution.get(self.action).copied().unwrap_or(0.0)
    }
}

/// A complete game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Recorded decision points, in play order.
    pub steps: Vec<RecordStep>,

    /// How the game ended. `Continue` for a game cut off by the move cap.
    pub result: GameResult,
}

impl GameRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            result: GameResult::Continue,
        }
    }

    /// Add a decision point.
    pub fn push(&mut self, step: RecordStep) {
        self.steps.push(step);
    }

    /// Set how the game ended.
    pub fn set_result(&mut self, result: GameResult) {
        self.result = result;
    }

    /// Final outcome from black's point of view: +1, -1 or 0.
    #[must_use]
    pub fn z(&self) -> f64 {
        self.result.outcome()
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps where `color` was to move.
    pub fn color_steps(&self, color: Color) -> impl Iterator<Item = &RecordStep> {
        self.steps.iter().filter(move |s| s.color == color)
    }

    /// Convert to training samples.
    ///
    /// The value target is `z` seen from the mover: +1 for every position
    /// of the eventual winner, -1 for the loser, 0 for both after a draw.
    pub fn to_training_samples(&self) -> Vec<TrainingSample> {
        let z = self.z();
        self.steps
            .iter()
            .map(|step| TrainingSample {
                board: step.board.clone(),
                color: step.color,
                policy: step.distribution.iter().map(|&p| p as f32).collect(),
                value: (z * f64::from(step.color.sign())) as f32,
            })
            .collect()
    }
}

impl Default for GameRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// A single training sample extracted from a game record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Position the mover faced.
    pub board: Board,

    /// Color to move.
    pub color: Color,

    /// Target policy (visit distribution).
    pub policy: Vec<f32>,

    /// Target value from the mover's perspective.
    pub value: f32,
}

/// Buffer for storing game records between training rounds.
///
/// Uses a FIFO strategy: when full, the oldest record is removed.
#[derive(Clone, Debug)]
pub struct ExperienceBuffer {
    records: VecDeque<GameRecord>,
    max_records: usize,
}

impl ExperienceBuffer {
    /// Create a new experience buffer.
    pub fn new(max_records: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(max_records),
            max_records,
        }
    }

    /// Add a record, evicting the oldest if the buffer is full.
    pub fn push(&mut self, record: GameRecord) {
        if self.max_records == 0 {
            return;
        }
        if self.records.len() >= self.max_records {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records.
    pub fn capacity(&self) -> usize {
        self.max_records
    }

    /// Remove all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Iterate over the records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &GameRecord> {
        self.records.iter()
    }

    /// Total number of steps across all records.
    pub fn total_steps(&self) -> usize {
        self.records.iter().map(GameRecord::len).sum()
    }

    /// All training samples in the buffer.
    pub fn to_training_samples(&self) -> Vec<TrainingSample> {
        self.records
            .iter()
            .flat_map(GameRecord::to_training_samples)
            .collect()
    }

    /// Draw up to `batch_size` distinct samples, reproducibly from `seed`.
    pub fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<TrainingSample> {
        let mut samples = self.to_training_samples();
        let limit = batch_size.min(samples.len());
        let mut rng = GameRng::new(seed);

        // Partial Fisher-Yates: the first `limit` slots end up uniformly drawn.
        for i in 0..limit {
            let j = i + rng.gen_range_usize(0..samples.len() - i);
            samples.swap(i, j);
        }
        samples.truncate(limit);
        samples
    }

    /// Draw a fraction of all samples, rounded down.
    pub fn sample_fraction(&self, fraction: f64, seed: u64) -> Vec<TrainingSample> {
        let total = self.total_steps();
        let count = (total as f64 * fraction.clamp(0.0, 1.0)) as usize;
        self.sample_batch(count, seed)
    }
}

impl Default for ExperienceBuffer {
    fn default() -> Self {
        Self::new(10000)
    }
}
