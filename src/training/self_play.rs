//! Self-play loop for generating training data.
//!
//! Runs games between agents (or one agent against itself) on a headless
//! [`Game`] and optionally records every decision for training.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::Agent;
use crate::core::{Color, Result, DEFAULT_BOARD_SIZE};
use crate::env::Game;
use crate::rules::{GameResult, Rules};

use super::trajectory::{ExperienceBuffer, GameRecord, RecordStep};

/// Configuration for self-play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// Board side length.
    pub board_size: usize,

    /// Rules the games are played under.
    pub rules: Rules,

    /// Maximum stones per game before it is cut off as undecided.
    pub max_moves: usize,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            rules: Rules::default(),
            max_moves: DEFAULT_BOARD_SIZE * DEFAULT_BOARD_SIZE,
        }
    }
}

impl SelfPlayConfig {
    /// Create a new self-play config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the board size. The move cap follows the board area.
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self.max_moves = size * size;
        self
    }

    /// Set the rules.
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the maximum number of stones per game.
    pub fn with_max_moves(mut self, max: usize) -> Self {
        self.max_moves = max;
        self
    }
}

/// Who sits at the board.
enum Seats<'a> {
    /// One agent playing both colors.
    Single(&'a mut dyn Agent),
    /// Black and white.
    Pair(&'a mut dyn Agent, &'a mut dyn Agent),
}

impl Seats<'_> {
    fn agent(&mut self, color: Color) -> &mut dyn Agent {
        match self {
            Seats::Single(agent) => {
                agent.set_color(color);
                &mut **agent
            }
            Seats::Pair(black, white) => match color {
                Color::Black => &mut **black,
                Color::White => &mut **white,
            },
        }
    }

    fn reset(&mut self) {
        match self {
            Seats::Single(agent) => agent.reset(),
            Seats::Pair(black, white) => {
                black.reset();
                white.reset();
            }
        }
    }
}

/// Worker for running games.
#[derive(Clone, Debug, Default)]
pub struct SelfPlayWorker {
    config: SelfPlayConfig,
}

impl SelfPlayWorker {
    /// Create a new worker.
    pub fn new(config: SelfPlayConfig) -> Self {
        Self { config }
    }

    /// Play one game with `agent` taking both sides.
    ///
    /// The agent's color is set before every move. A search agent must be
    /// in self-play mode so its tree follows both sides through the last
    /// move.
    pub fn play_self(
        &self,
        agent: &mut dyn Agent,
        record: Option<&mut GameRecord>,
    ) -> Result<GameResult> {
        self.run(Seats::Single(agent), record)
    }

    /// Play one game between two agents.
    ///
    /// Search agents must not be in self-play mode: each one's tree has to
    /// advance past its own moves.
    pub fn play_game(
        &self,
        black: &mut dyn Agent,
        white: &mut dyn Agent,
        record: Option<&mut GameRecord>,
    ) -> Result<GameResult> {
        self.run(Seats::Pair(black, white), record)
    }

    /// Play `count` self-play games, collecting their records into `buffer`.
    ///
    /// Returns the number of games won by black, won by white, and drawn
    /// or cut off.
    pub fn generate(
        &self,
        agent: &mut dyn Agent,
        count: usize,
        buffer: &mut ExperienceBuffer,
    ) -> Result<(usize, usize, usize)> {
        let mut tally = (0, 0, 0);
        for game in 0..count {
            let mut record = GameRecord::new();
            let result = self.play_self(agent, Some(&mut record))?;
            match result.winner() {
                Some(Color::Black) => tally.0 += 1,
                Some(Color::White) => tally.1 += 1,
                None => tally.2 += 1,
            }
            debug!(game, steps = record.len(), "record collected");
            buffer.push(record);
        }
        Ok(tally)
    }

    /// Get the configuration.
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    fn run(&self, mut seats: Seats<'_>, record: Option<&mut GameRecord>) -> Result<GameResult> {
        let mut game = Game::with_rules(self.config.board_size, self.config.rules);
        let outcome = self.play_out(&mut game, &mut seats, record);
        // Agents start every game from a fresh tree, even after an error.
        seats.reset();

        if let Ok(result) = &outcome {
            info!(result = %result, moves = game.stone_num(), "game finished");
        }
        outcome
    }

    fn play_out(
        &self,
        game: &mut Game,
        seats: &mut Seats<'_>,
        mut record: Option<&mut GameRecord>,
    ) -> Result<GameResult> {
        while !game.is_over() && game.stone_num() < self.config.max_moves {
            let color = game.current_player();
            let move_number = game.stone_num();
            let board = game.board().clone();

            let mv = seats.agent(color).play(&board, game.last_move(), move_number)?;
            game.play(mv.action)?;

            if let (Some(record), Some(distribution)) = (record.as_deref_mut(), mv.distribution) {
                record.push(RecordStep {
                    board,
                    color,
                    distribution,
                    action: mv.action,
                    move_number,
                });
            }
        }

        let result = game.result();
        if let Some(record) = record {
            record.set_result(result);
        }
        Ok(result)
    }
}
