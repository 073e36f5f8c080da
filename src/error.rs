//! Errors reported by game operations.

use derive_more::Display;
use serde::Serialize;
use tictac_board::{GameStatus, Player};

use crate::GameId;
use crate::store::StoreError;

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InvalidMoveReason {
    /// Row or column outside `[0, 2]`.
    #[display("Row/Col out of bounds: ({}, {})", row, col)]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },

    /// The mover is not the player whose turn it is.
    #[display("Invalid turn. Expected: {}, got: {}", expected, got)]
    WrongTurn {
        /// Player allowed to move.
        expected: Player,
        /// Player who tried to move.
        got: Player,
    },

    /// Target cell already holds a mark.
    #[display("Cell is occupied: ({}, {})", row, col)]
    CellOccupied {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },
}

/// Stable, machine-readable name of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Game id unknown.
    GameNotFound,
    /// Move rejected by validation.
    InvalidMove,
    /// Game already reached a terminal status.
    GameFinished,
    /// Optimistic retries exhausted.
    ConcurrencyConflict,
    /// Request parameters rejected.
    InvalidRequest,
    /// Storage backend failed.
    StorageError,
}

/// Failure of a game operation.
///
/// None of these leave a partially written game behind.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameError {
    /// The referenced game does not exist.
    #[display("Game not found: {}", _0)]
    NotFound(GameId),

    /// The move is illegal in the current position.
    #[display("{}", _0)]
    InvalidMove(InvalidMoveReason),

    /// The game already ended.
    #[display("Game already finished with status: {}", _0)]
    GameFinished(GameStatus),

    /// Every commit attempt lost to a concurrent writer.
    #[display("Concurrent update detected. Please retry")]
    ConcurrencyConflict {
        /// Game that was contended.
        id: GameId,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Request parameters were rejected before touching storage.
    #[display("{}", _0)]
    InvalidRequest(String),

    /// The store failed for a reason other than the ones above.
    #[display("Storage failure: {}", _0)]
    Storage(StoreError),
}

impl GameError {
    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::NotFound(_) => ErrorKind::GameNotFound,
            GameError::InvalidMove(_) => ErrorKind::InvalidMove,
            GameError::GameFinished(_) => ErrorKind::GameFinished,
            GameError::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
            GameError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            GameError::Storage(_) => ErrorKind::StorageError,
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidMoveReason> for GameError {
    fn from(reason: InvalidMoveReason) -> Self {
        GameError::InvalidMove(reason)
    }
}

impl From<StoreError> for GameError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => GameError::NotFound(id),
            other => GameError::Storage(other),
        }
    }
}
