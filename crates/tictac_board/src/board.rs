//! The 3x3 board and its textual form.

use crate::position::{BOARD_SIZE, CELL_COUNT};
use crate::types::{Cell, Mark};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

/// 3x3 tic-tac-toe board.
///
/// Cells are stored in row-major order. The board is a small `Copy` value:
/// every change produces a new board rather than mutating a shared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

/// Error returned when a textual board cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BoardParseError {
    /// Input did not contain exactly nine cells.
    #[display("Board must have exactly 9 cells, got {}", _0)]
    WrongLength(usize),
    /// Input contained a character other than `X`, `O` or `_`.
    #[display("Unknown cell character '{}' at index {}", ch, index)]
    UnknownCell {
        /// Offending position.
        index: usize,
        /// Offending character.
        ch: char,
    },
}

impl std::error::Error for BoardParseError {}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Builds a board from explicit cells.
    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Returns all cells in row-major order.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Gets the cell at the given index (0-8).
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if the cell at `index` is empty. Out-of-range indices are not empty.
    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.cell(index), Some(Cell::Empty))
    }

    /// Counts the cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Marked(mark))
            .count()
    }

    /// Counts the empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }

    /// Formats the board as a human-readable grid.
    pub fn render_grid(&self) -> String {
        let mut result = String::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let symbol = match self.cells[row * BOARD_SIZE + col] {
                    Cell::Empty => ' ',
                    Cell::Marked(mark) => mark.as_char(),
                };
                result.push(symbol);
                if col < BOARD_SIZE - 1 {
                    result.push('|');
                }
            }
            if row < BOARD_SIZE - 1 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Returns a copy of `board` with `index` holding `mark`.
///
/// Prior occupancy is not checked; callers validate the target cell first.
/// `index` must be below 9.
#[instrument]
pub fn set_at(board: &Board, index: usize, mark: Mark) -> Board {
    let mut cells = board.cells;
    cells[index] = Cell::Marked(mark);
    Board { cells }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != CELL_COUNT {
            return Err(BoardParseError::WrongLength(chars.len()));
        }

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (index, ch) in chars.into_iter().enumerate() {
            cells[index] = Cell::from_char(ch).ok_or(BoardParseError::UnknownCell { index, ch })?;
        }
        Ok(Self { cells })
    }
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board.to_string()
    }
}

impl TryFrom<String> for Board {
    type Error = BoardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
