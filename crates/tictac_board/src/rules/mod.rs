//! Game rules for tic-tac-toe.
//!
//! Pure functions for evaluating a board. Rules are kept apart from board
//! storage so the move protocol can compose them in a fixed order.

pub mod draw;
pub mod win;

pub use draw::is_draw;
pub use win::{WINNING_LINES, has_won};
