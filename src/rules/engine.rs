//! Terminal-state detection for five-in-a-row.
//!
//! After a stone is placed, the game ends when that stone completes a line
//! of `win_length` (or more) same-colored stones along one of the four axes
//! through it, or when the board is full.

use smallvec::SmallVec;

use crate::core::board::{index_to_coordinate, Board};
use crate::core::stone::Color;
use serde::{Deserialize, Serialize};

/// The four line axes: horizontal, vertical, diagonal, anti-diagonal.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Default number of stones in a row needed to win.
pub const DEFAULT_WIN_LENGTH: usize = 5;

/// Default fast-exit threshold: with this many stones or fewer, no line check runs.
pub const DEFAULT_FAST_EXIT_STONES: usize = 8;

/// Outcome of checking a position after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// The game goes on.
    Continue,
    /// Black completed a line.
    BlackWins,
    /// White completed a line.
    WhiteWins,
    /// Every cell is occupied and nobody won.
    Full,
}

impl GameResult {
    /// Win result for a color.
    #[must_use]
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::Black => GameResult::BlackWins,
            Color::White => GameResult::WhiteWins,
        }
    }

    /// Has the game ended?
    #[must_use]
    pub const fn is_decisive(self) -> bool {
        !matches!(self, GameResult::Continue)
    }

    /// The winning color, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameResult::BlackWins => Some(Color::Black),
            GameResult::WhiteWins => Some(Color::White),
            _ => None,
        }
    }

    /// Outcome from black's point of view: +1 black wins, -1 white wins, 0 otherwise.
    #[must_use]
    pub const fn outcome(self) -> f64 {
        match self {
            GameResult::BlackWins => 1.0,
            GameResult::WhiteWins => -1.0,
            _ => 0.0,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GameResult::Continue => "continue",
            GameResult::BlackWins => "blackwins",
            GameResult::WhiteWins => "whitewins",
            GameResult::Full => "full",
        };
        f.write_str(s)
    }
}

/// Counts a run of same-colored stones along one axis.
///
/// This is the expensive part of terminal detection; it is a trait so the
/// fast-exit path can be observed in tests.
pub trait LineCounter {
    /// Length of the run of `color` stones through `(row, col)` along `axis`,
    /// including the stone at `(row, col)`. Each direction extends at most
    /// `reach` cells.
    fn count_line(
        &self,
        board: &Board,
        row: usize,
        col: usize,
        axis: (isize, isize),
        color: Color,
        reach: usize,
    ) -> usize;
}

/// Walks the board in both senses of an axis, stopping at edges and at the
/// first cell of another color.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoneLineCounter;

impl StoneLineCounter {
    fn extend(
        board: &Board,
        row: usize,
        col: usize,
        (dr, dc): (isize, isize),
        color: Color,
        reach: usize,
    ) -> usize {
        let size = board.size() as isize;
        let mut count = 0;
        let (mut r, mut c) = (row as isize, col as isize);
        for _ in 0..reach {
            r += dr;
            c += dc;
            if r < 0 || c < 0 || r >= size || c >= size {
                break;
            }
            if board.at(r as usize, c as usize) != color.sign() {
                break;
            }
            count += 1;
        }
        count
    }
}

impl LineCounter for StoneLineCounter {
    fn count_line(
        &self,
        board: &Board,
        row: usize,
        col: usize,
        axis: (isize, isize),
        color: Color,
        reach: usize,
    ) -> usize {
        let (dr, dc) = axis;
        1 + Self::extend(board, row, col, (dr, dc), color, reach)
            + Self::extend(board, row, col, (-dr, -dc), color, reach)
    }
}

/// Five-in-a-row rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Stones in a row needed to win.
    pub win_length: usize,

    /// With this many stones on the board or fewer, skip line counting.
    ///
    /// With alternating play a five needs at least nine stones on the board,
    /// so the default of 8 never misses a win.
    pub fast_exit_stones: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            win_length: DEFAULT_WIN_LENGTH,
            fast_exit_stones: DEFAULT_FAST_EXIT_STONES,
        }
    }
}

impl Rules {
    /// Create rules with a custom win length and fast-exit threshold.
    #[must_use]
    pub fn new(win_length: usize, fast_exit_stones: usize) -> Self {
        Self {
            win_length,
            fast_exit_stones,
        }
    }

    /// Check the position after `color_just_moved` placed a stone at `last_action`.
    pub fn check_terminal(
        &self,
        board: &Board,
        last_action: usize,
        color_just_moved: Color,
    ) -> GameResult {
        self.check_terminal_with(&StoneLineCounter, board, last_action, color_just_moved)
    }

    /// [`check_terminal`](Self::check_terminal) with a custom line counter.
    pub fn check_terminal_with<C: LineCounter + ?Sized>(
        &self,
        counter: &C,
        board: &Board,
        last_action: usize,
        color_just_moved: Color,
    ) -> GameResult {
        debug_assert_eq!(
            board.cell(last_action),
            color_just_moved.sign(),
            "last action must hold the mover's stone"
        );

        let stones = board.stone_count();
        if stones > self.fast_exit_stones {
            let (row, col) = (last_action / board.size(), last_action % board.size());
            let reach = self.win_length.saturating_sub(1);
            for axis in AXES {
                if counter.count_line(board, row, col, axis, color_just_moved, reach)
                    >= self.win_length
                {
                    return GameResult::win_for(color_just_moved);
                }
            }
        }

        if stones == board.area() {
            GameResult::Full
        } else {
            GameResult::Continue
        }
    }

    /// Cells of the winning line through `last_action`, if the move won.
    ///
    /// Useful for reporting; the search only needs [`check_terminal`](Self::check_terminal).
    pub fn winning_line(
        &self,
        board: &Board,
        last_action: usize,
        color: Color,
    ) -> Option<SmallVec<[usize; 9]>> {
        let size = board.size();
        let (row, col) = index_to_coordinate(last_action, size).ok()?;
        if board.at(row, col) != color.sign() {
            return None;
        }

        for (dr, dc) in AXES {
            let mut line: SmallVec<[usize; 9]> = SmallVec::new();
            // Walk back to the start of the run, then forward across it.
            let (mut r, mut c) = (row as isize, col as isize);
            while in_bounds(r - dr, c - dc, size) && board.at((r - dr) as usize, (c - dc) as usize) == color.sign() {
                r -= dr;
                c -= dc;
            }
            while in_bounds(r, c, size) && board.at(r as usize, c as usize) == color.sign() {
                line.push(r as usize * size + c as usize);
                r += dr;
                c += dc;
            }
            if line.len() >= self.win_length {
                return Some(line);
            }
        }
        None
    }
}

fn in_bounds(r: isize, c: isize, size: usize) -> bool {
    r >= 0 && c >= 0 && (r as usize) < size && (c as usize) < size
}

/// Check a position with the default rules.
pub fn check_terminal(board: &Board, last_action: usize, color_just_moved: Color) -> GameResult {
    Rules::default().check_terminal(board, last_action, color_just_moved)
}
