//! Database row models and conversions to domain types.

use chrono::NaiveDateTime;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::store::{DbError, schema};
use crate::{Game, GameId};

/// Stored game row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    seq: i32,
    id: String,
    board: String,
    next_player: String,
    status: String,
    version: i64,
    created_at: NaiveDateTime,
}

impl GameRow {
    /// Parses the stored columns into a [`Game`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a column holds a value the domain types reject.
    #[instrument(skip(self), fields(seq = self.seq, id = %self.id))]
    pub fn into_game(self) -> Result<Game, DbError> {
        let id: GameId = self
            .id
            .parse()
            .map_err(|e| DbError::new(format!("Invalid game id '{}': {}", self.id, e)))?;
        let board = self
            .board
            .parse()
            .map_err(|e| DbError::new(format!("Invalid board '{}': {}", self.board, e)))?;
        let next_player = self
            .next_player
            .parse()
            .map_err(|e| DbError::new(format!("Invalid player '{}': {}", self.next_player, e)))?;
        let status = self
            .status
            .parse()
            .map_err(|e| DbError::new(format!("Invalid status '{}': {}", self.status, e)))?;
        let version = u64::try_from(self.version)
            .map_err(|_| DbError::new(format!("Negative version {}", self.version)))?;

        Ok(Game::from_parts(
            id,
            board,
            next_player,
            status,
            version,
            self.created_at,
        ))
    }
}

/// Insertable game row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGameRow {
    id: String,
    board: String,
    next_player: String,
    status: String,
    version: i64,
    created_at: NaiveDateTime,
}

impl NewGameRow {
    /// Builds the row for a freshly created game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the version does not fit the column.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game) -> Result<Self, DbError> {
        Ok(Self::new(
            game.id().to_string(),
            game.board().to_string(),
            game.next_player().to_string(),
            game.status().to_string(),
            version_column(game.version())?,
            game.created_at(),
        ))
    }
}

/// Converts a domain version to the signed column type.
pub fn version_column(version: u64) -> Result<i64, DbError> {
    i64::try_from(version).map_err(|_| DbError::new(format!("Version {} out of range", version)))
}
