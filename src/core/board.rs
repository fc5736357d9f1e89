//! Square board snapshots and index/coordinate conversion.
//!
//! ## Indexing
//!
//! Cells are addressed either by a `(row, col)` coordinate or by a linear
//! action index `size * row + col` in `[0, size²)`. All per-cell vectors
//! (legality masks, policies, visit distributions) use row-major order.
//!
//! ```
//! use gomoku_zero::core::{coordinate_to_index, index_to_coordinate};
//!
//! let index = coordinate_to_index(2, 3, 15).unwrap();
//! assert_eq!(index, 33);
//! assert_eq!(index_to_coordinate(index, 15).unwrap(), (2, 3));
//! ```

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::stone::{Color, EMPTY};

/// Default board size.
pub const DEFAULT_BOARD_SIZE: usize = 15;

/// Convert a linear index to a `(row, col)` coordinate.
pub fn index_to_coordinate(index: usize, size: usize) -> Result<(usize, usize)> {
    if index >= size * size {
        return Err(Error::IndexOutOfRange { index, size });
    }
    Ok((index / size, index % size))
}

/// Convert a `(row, col)` coordinate to a linear index.
pub fn coordinate_to_index(row: usize, col: usize, size: usize) -> Result<usize> {
    if row >= size || col >= size {
        return Err(Error::OutOfBoard { row, col, size });
    }
    Ok(size * row + col)
}

/// Legality mask of a board: `true` where the cell is empty.
pub fn legality_mask(board: &Board) -> Vec<bool> {
    board.cells.iter().map(|&cell| cell == EMPTY).collect()
}

/// An N×N grid of `{EMPTY, BLACK, WHITE}` cells.
///
/// Boards are plain values: cloning produces an independent copy, so a
/// snapshot handed to the search never aliases the caller's board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<i8>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![EMPTY; size * size],
        }
    }

    /// Build a board from row-major cell values.
    pub fn from_cells(size: usize, cells: Vec<i8>) -> Result<Self> {
        if cells.len() != size * size {
            return Err(Error::BoardShape {
                expected: size * size,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Build a board from a grid of rows.
    pub fn from_rows(rows: &[Vec<i8>]) -> Result<Self> {
        let size = rows.len();
        let cells: Vec<i8> = rows.iter().flatten().copied().collect();
        if rows.iter().any(|r| r.len() != size) {
            return Err(Error::BoardShape {
                expected: size * size,
                actual: cells.len(),
            });
        }
        Self::from_cells(size, cells)
    }

    /// Side length.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells (the size of the action space).
    #[inline]
    #[must_use]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Raw cell value at a linear index.
    #[inline]
    #[must_use]
    pub fn cell(&self, index: usize) -> i8 {
        self.cells[index]
    }

    /// Raw cell value at a coordinate.
    #[inline]
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> i8 {
        self.cells[self.size * row + col]
    }

    /// Stone color at a coordinate, `None` if empty.
    #[must_use]
    pub fn stone(&self, row: usize, col: usize) -> Option<Color> {
        Color::from_sign(self.at(row, col))
    }

    /// Is the cell at `index` empty?
    #[inline]
    #[must_use]
    pub fn is_empty_at(&self, index: usize) -> bool {
        self.cells[index] == EMPTY
    }

    /// Row-major cell values.
    #[must_use]
    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    /// Copy the board out as a grid of rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<i8>> {
        self.cells.chunks(self.size.max(1)).map(<[i8]>::to_vec).collect()
    }

    /// Place a stone at a linear index without any rule checks.
    ///
    /// The search uses this on its working copies; the environment validates
    /// moves before calling it.
    #[inline]
    pub fn place(&mut self, index: usize, color: Color) {
        debug_assert!(self.cells[index] == EMPTY, "placing on occupied cell {index}");
        self.cells[index] = color.sign();
    }

    /// Clear a cell.
    #[inline]
    pub fn remove(&mut self, index: usize) {
        self.cells[index] = EMPTY;
    }

    /// Number of stones on the board.
    #[must_use]
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    /// Is every cell occupied?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != EMPTY)
    }

    /// Remove all stones.
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            let line: String = row
                .iter()
                .map(|&c| match Color::from_sign(c) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stone::{BLACK, WHITE};

    #[test]
    fn test_index_coordinate_bounds() {
        assert_eq!(index_to_coordinate(224, 15).unwrap(), (14, 14));
        assert_eq!(
            index_to_coordinate(225, 15),
            Err(Error::IndexOutOfRange { index: 225, size: 15 })
        );
        assert_eq!(
            coordinate_to_index(15, 0, 15),
            Err(Error::OutOfBoard { row: 15, col: 0, size: 15 })
        );
    }

    #[test]
    fn test_place_and_count() {
        let mut board = Board::new(9);
        board.place(0, Color::Black);
        board.place(10, Color::White);

        assert_eq!(board.stone_count(), 2);
        assert_eq!(board.cell(0), BLACK);
        assert_eq!(board.at(1, 1), WHITE);
        assert_eq!(board.stone(1, 1), Some(Color::White));
        assert_eq!(board.stone(2, 2), None);

        board.remove(0);
        assert!(board.is_empty_at(0));
        assert_eq!(board.stone_count(), 1);
    }

    #[test]
    fn test_legality_mask() {
        let mut board = Board::new(3);
        board.place(4, Color::Black);
        let mask = legality_mask(&board);

        assert_eq!(mask.len(), 9);
        assert!(!mask[4]);
        assert_eq!(mask.iter().filter(|&&m| m).count(), 8);
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&[vec![1, 0], vec![0, -1]]).unwrap();
        assert_eq!(board.size(), 2);
        assert_eq!(board.to_rows(), vec![vec![1, 0], vec![0, -1]]);

        let ragged = Board::from_rows(&[vec![1, 0], vec![0]]);
        assert!(matches!(ragged, Err(Error::BoardShape { .. })));
    }

    #[test]
    fn test_full_and_clear() {
        let mut board = Board::from_cells(2, vec![1, -1, -1, 1]).unwrap();
        assert!(board.is_full());
        board.clear();
        assert_eq!(board.stone_count(), 0);
    }

    #[test]
    fn test_snapshot_does_not_alias() {
        let mut board = Board::new(5);
        let snapshot = board.clone();
        board.place(3, Color::Black);
        assert!(snapshot.is_empty_at(3));
    }

    #[test]
    fn test_display() {
        let board = Board::from_cells(2, vec![1, 0, 0, -1]).unwrap();
        assert_eq!(format!("{board}"), "X.\n.O\n");
    }
}
