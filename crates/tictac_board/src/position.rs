//! Row/column addressing for the 3x3 board.

/// Number of rows and columns.
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Converts a row and column (each 0-2) to a row-major board index (0-8).
pub fn to_index(row: usize, col: usize) -> usize {
    row * BOARD_SIZE + col
}

/// True iff both `row` and `col` lie in `[0, 2]`.
///
/// Takes signed values so that negative coordinates from a request can be
/// rejected instead of wrapping.
pub fn within_bounds(row: i64, col: i64) -> bool {
    let size = BOARD_SIZE as i64;
    (0..size).contains(&row) && (0..size).contains(&col)
}

/// Converts a board index back to `(row, col)`.
pub fn coords(index: usize) -> (usize, usize) {
    (index / BOARD_SIZE, index % BOARD_SIZE)
}
