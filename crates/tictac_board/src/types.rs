//! Core domain types for the board engine.

use serde::{Deserialize, Serialize};

/// Player in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        opposite(self)
    }
}

/// Symbol a player places on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// Placed by [`Player::X`].
    X,
    /// Placed by [`Player::O`].
    O,
}

impl Mark {
    /// Character used in the textual board form.
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// Returns the mark placed by `player`.
pub fn mark_of(player: Player) -> Mark {
    match player {
        Player::X => Mark::X,
        Player::O => Mark::O,
    }
}

/// Returns the other player.
pub fn opposite(player: Player) -> Player {
    match player {
        Player::X => Player::O,
        Player::O => Player::X,
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nobody has played here yet.
    #[default]
    Empty,
    /// Cell holds a mark.
    Marked(Mark),
}

impl Cell {
    /// Character used for an empty cell in the textual board form.
    pub const EMPTY_CHAR: char = '_';

    /// Converts the cell to its board character.
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => Self::EMPTY_CHAR,
            Cell::Marked(mark) => mark.as_char(),
        }
    }

    /// Parses a board character.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            Self::EMPTY_CHAR => Some(Cell::Empty),
            'X' => Some(Cell::Marked(Mark::X)),
            'O' => Some(Cell::Marked(Mark::O)),
            _ => None,
        }
    }
}

/// Current status of a game.
///
/// `InProgress` is the only non-terminal status. The textual names are the
/// ones stored in the database and exchanged over HTTP.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum GameStatus {
    /// Game is ongoing.
    #[serde(rename = "IN_PROGRESS")]
    #[strum(to_string = "IN_PROGRESS")]
    InProgress,
    /// X completed a line.
    #[serde(rename = "X_WON")]
    #[strum(to_string = "X_WON")]
    XWon,
    /// O completed a line.
    #[serde(rename = "O_WON")]
    #[strum(to_string = "O_WON")]
    OWon,
    /// Board filled with no line.
    #[serde(rename = "DRAW")]
    #[strum(to_string = "DRAW")]
    Draw,
}

impl GameStatus {
    /// Status recorded when `player` completes a line.
    pub fn won_by(player: Player) -> Self {
        match player {
            Player::X => GameStatus::XWon,
            Player::O => GameStatus::OWon,
        }
    }

    /// True for `XWon`, `OWon` and `Draw`.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}
