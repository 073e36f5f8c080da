//! Tic-tac-toe board engine.
//!
//! Stateless functions over a 9-cell board: addressing, placing a mark,
//! and detecting wins and draws. Nothing here performs I/O or keeps state;
//! the persistence and concurrency concerns live in `tictac_arena`.
//!
//! # Example
//!
//! ```
//! use tictac_board::{Board, Mark, has_won, set_at, to_index};
//!
//! let mut board = Board::new();
//! for col in 0..3 {
//!     board = set_at(&board, to_index(0, col), Mark::X);
//! }
//! assert!(has_won(&board, Mark::X));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod position;
pub mod rules;
mod types;

pub use board::{Board, BoardParseError, set_at};
pub use position::{BOARD_SIZE, CELL_COUNT, coords, to_index, within_bounds};
pub use rules::{WINNING_LINES, has_won, is_draw};
pub use types::{Cell, GameStatus, Mark, Player, mark_of, opposite};
