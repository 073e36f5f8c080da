//! Win detection logic for tic-tac-toe.

use crate::{Board, Cell, Mark};
use tracing::instrument;

/// The 8 lines that win the game: 3 rows, 3 columns, 2 diagonals.
#[rustfmt::skip]
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],            // Diagonals
];

/// Checks whether `mark` occupies a complete winning line.
#[instrument]
pub fn has_won(board: &Board, mark: Mark) -> bool {
    let target = Some(Cell::Marked(mark));
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&i| board.cell(i) == target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{set_at, to_index};

    fn board(text: &str) -> Board {
        text.parse().expect("Valid board")
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert!(!has_won(&board, Mark::X));
        assert!(!has_won(&board, Mark::O));
    }

    #[test]
    fn test_every_line_wins() {
        for line in WINNING_LINES {
            for mark in [Mark::X, Mark::O] {
                let mut b = Board::new();
                for i in line {
                    b = set_at(&b, i, mark);
                }
                assert!(has_won(&b, mark), "line {line:?} should win for {mark}");
            }
        }
    }

    #[test]
    fn test_winner_top_row() {
        let b = board("XXX_OO___");
        assert!(has_won(&b, Mark::X));
        assert!(!has_won(&b, Mark::O));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let b = board("XXO_O_O_X");
        assert!(has_won(&b, Mark::O));
        assert!(!has_won(&b, Mark::X));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let b = board("XX_OO____");
        assert!(!has_won(&b, Mark::X));
        assert!(!has_won(&b, Mark::O));
    }

    #[test]
    fn test_mixed_line_does_not_win() {
        let b = board("XOX______");
        assert!(!has_won(&b, Mark::X));
        assert!(!has_won(&b, Mark::O));
    }

    #[test]
    fn test_only_fixed_triples_count() {
        // Three X marks that are not collinear.
        let mut b = Board::new();
        for (row, col) in [(0, 0), (1, 2), (2, 1)] {
            b = set_at(&b, to_index(row, col), Mark::X);
        }
        assert!(!has_won(&b, Mark::X));
    }
}
