//! Game state and move validation.

use serde::{Deserialize, Serialize};

use crate::core::{coordinate_to_index, index_to_coordinate, Board, Color, Error, Result};
use crate::rules::{GameResult, Rules};

/// A five-in-a-row game in progress.
///
/// Black moves first. Unlike the search, which places stones on its working
/// copies without checks, `play` rejects moves outside the board, onto
/// occupied cells, and after the game has been decided.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    rules: Rules,
    current: Color,
    last_move: Option<usize>,
    /// Number of black moves so far.
    round: usize,
    result: GameResult,
    history: Vec<usize>,
}

impl Game {
    /// Start a game on an empty `size`×`size` board with the default rules.
    pub fn new(size: usize) -> Self {
        Self::with_rules(size, Rules::default())
    }

    /// Start a game with custom rules.
    pub fn with_rules(size: usize, rules: Rules) -> Self {
        Self {
            board: Board::new(size),
            rules,
            current: Color::Black,
            last_move: None,
            round: 0,
            result: GameResult::Continue,
            history: Vec::new(),
        }
    }

    /// Load an arbitrary position.
    ///
    /// The player to move follows from the stone counts: equal counts mean
    /// black, one extra black stone means white. Any other count is an
    /// [`Error::IllegalPosition`]. The last move is unknown, so the move
    /// history starts empty.
    pub fn from_board(board: Board, rules: Rules) -> Result<Self> {
        let black = board.cells().iter().filter(|&&c| c == Color::Black.sign()).count();
        let white = board.cells().iter().filter(|&&c| c == Color::White.sign()).count();
        let current = if black == white {
            Color::Black
        } else if black == white + 1 {
            Color::White
        } else {
            return Err(Error::IllegalPosition { black, white });
        };

        let won = board
            .cells()
            .iter()
            .enumerate()
            .filter_map(|(index, &cell)| {
                Color::from_sign(cell).map(|color| rules.check_terminal(&board, index, color))
            })
            .find(|result| result.winner().is_some());
        let result = match won {
            Some(result) => result,
            None if board.is_full() => GameResult::Full,
            None => GameResult::Continue,
        };

        Ok(Self {
            board,
            rules,
            current,
            last_move: None,
            round: black,
            result,
            history: Vec::new(),
        })
    }

    /// Place a stone for the player to move at a linear index.
    ///
    /// Returns the state of the game after the move.
    pub fn play(&mut self, action: usize) -> Result<GameResult> {
        if self.result.is_decisive() {
            return Err(Error::GameOver);
        }
        let (row, col) = index_to_coordinate(action, self.board.size())?;
        if !self.board.is_empty_at(action) {
            return Err(Error::Occupied { row, col });
        }

        let color = self.current;
        self.board.place(action, color);
        if color == Color::Black {
            self.round += 1;
        }
        self.last_move = Some(action);
        self.history.push(action);
        self.current = color.opposite();
        self.result = self.rules.check_terminal(&self.board, action, color);
        Ok(self.result)
    }

    /// [`play`](Self::play) with a `(row, col)` coordinate.
    pub fn play_at(&mut self, row: usize, col: usize) -> Result<GameResult> {
        let action = coordinate_to_index(row, col, self.board.size())?;
        self.play(action)
    }

    /// Reset to an empty board with black to move.
    pub fn clear(&mut self) {
        self.board.clear();
        self.current = Color::Black;
        self.last_move = None;
        self.round = 0;
        self.result = GameResult::Continue;
        self.history.clear();
    }

    /// Current board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Rules in force.
    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Player to move.
    #[must_use]
    pub fn current_player(&self) -> Color {
        self.current
    }

    /// Linear index of the last move.
    #[must_use]
    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    /// `(row, col)` of the last move.
    #[must_use]
    pub fn last_move_coordinate(&self) -> Option<(usize, usize)> {
        let size = self.board.size();
        self.last_move.map(|action| (action / size, action % size))
    }

    /// Number of black moves made.
    #[must_use]
    pub fn round(&self) -> usize {
        self.round
    }

    /// Number of stones on the board.
    #[must_use]
    pub fn stone_num(&self) -> usize {
        match self.current {
            Color::Black => 2 * self.round,
            Color::White => (2 * self.round).saturating_sub(1),
        }
    }

    /// State of the game.
    #[must_use]
    pub fn result(&self) -> GameResult {
        self.result
    }

    /// Has the game been decided?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_decisive()
    }

    /// Moves played since the game started (or since it was loaded).
    #[must_use]
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Empty cells.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<usize> {
        (0..self.board.area())
            .filter(|&index| self.board.is_empty_at(index))
            .collect()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(crate::core::DEFAULT_BOARD_SIZE)
    }
}
