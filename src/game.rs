//! The persisted game record.

use chrono::{NaiveDateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tictac_board::{Board, GameStatus, Player};
use uuid::Uuid;

/// Unique identifier of a game, assigned at creation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Allocates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for GameId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A versioned tic-tac-toe game.
///
/// `version` starts at 0 and is bumped by the store on every successful
/// commit, never by the game itself. Values are treated as immutable
/// snapshots: a move builds a new `Game` from the loaded one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    board: Board,
    next_player: Player,
    status: GameStatus,
    version: u64,
    created_at: NaiveDateTime,
}

impl Game {
    /// Creates a new game: empty board, X to move, in progress, version 0.
    pub fn new() -> Self {
        Self {
            id: GameId::new(),
            board: Board::new(),
            next_player: Player::X,
            status: GameStatus::InProgress,
            version: 0,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Reassembles a game from stored parts.
    pub(crate) fn from_parts(
        id: GameId,
        board: Board,
        next_player: Player,
        status: GameStatus,
        version: u64,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            board,
            next_player,
            status,
            version,
            created_at,
        }
    }

    /// Returns the game id.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player allowed to move next.
    ///
    /// Left at its last value once the game is over.
    pub fn next_player(&self) -> Player {
        self.next_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the version this snapshot was read at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation time (UTC).
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Returns a copy with a new board, status and next player.
    ///
    /// Identity, version and creation time are carried over unchanged.
    pub(crate) fn with_position(
        &self,
        board: Board,
        next_player: Player,
        status: GameStatus,
    ) -> Self {
        Self {
            board,
            next_player,
            status,
            ..self.clone()
        }
    }

    /// Returns a copy in the initial position, keeping identity and version.
    pub(crate) fn cleared(&self) -> Self {
        self.with_position(Board::new(), Player::X, GameStatus::InProgress)
    }

    /// Returns a copy stamped with `version`.
    pub(crate) fn with_version(&self, version: u64) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
