//! Draw detection logic for tic-tac-toe.

use crate::{Board, Cell};
use tracing::instrument;

/// Checks if the board is full (no empty cell left).
///
/// This says nothing about lines: a full board that also holds a winning
/// line is still "full". Callers check for a win first.
#[instrument]
pub fn is_draw(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}
