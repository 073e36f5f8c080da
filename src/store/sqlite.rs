//! SQLite-backed game store.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::store::models::{GameRow, NewGameRow, version_column};
use crate::store::schema::games;
use crate::store::{DbError, GameStore, StoreError, StoredPage};
use crate::{Game, GameId};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds SQLite waits on a locked database before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Game store persisted in a SQLite database.
///
/// All calls share one connection behind a mutex, which also makes
/// `":memory:"` databases usable. Calls are synchronous and block the calling
/// thread, for up to the 5 s busy timeout when another process holds the
/// write lock. Conditional commits run as a single
/// `UPDATE ... WHERE id = ? AND version = ?` inside an immediate
/// transaction, so other processes writing the same file are excluded too.
#[derive(Clone)]
pub struct SqliteGameStore {
    db_path: String,
    conn: Arc<Mutex<SqliteConnection>>,
}

impl fmt::Debug for SqliteGameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteGameStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SqliteGameStore {
    /// Opens (creating if needed) the database at `db_path` and applies
    /// pending migrations.
    ///
    /// Use `":memory:"` for a throwaway database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening SQLite game store");
        let mut conn = SqliteConnection::establish(&db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", db_path, e)))?;

        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .execute(&mut conn)?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(applied = applied.len(), "Migrations up to date");

        Ok(Self {
            db_path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Returns the database path this store was opened with.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    fn connection(&self) -> Result<MutexGuard<'_, SqliteConnection>, StoreError> {
        debug!(path = %self.db_path, "Acquiring connection");
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend(DbError::new("SQLite connection lock poisoned")))
    }
}

impl GameStore for SqliteGameStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn insert(&self, game: &Game) -> Result<Game, StoreError> {
        let row = NewGameRow::from_game(game)?;
        let mut conn = self.connection()?;

        let stored: GameRow = diesel::insert_into(games::table)
            .values(&row)
            .returning(GameRow::as_returning())
            .get_result(&mut *conn)?;

        debug!("Game inserted");
        Ok(stored.into_game()?)
    }

    #[instrument(skip(self))]
    fn load(&self, id: GameId) -> Result<Game, StoreError> {
        let id_text = id.to_string();
        let mut conn = self.connection()?;

        let row: Option<GameRow> = games::table
            .filter(games::id.eq(id_text.as_str()))
            .select(GameRow::as_select())
            .first(&mut *conn)
            .optional()?;

        match row {
            Some(row) => Ok(row.into_game()?),
            None => {
                debug!("Game not found");
                Err(StoreError::NotFound(id))
            }
        }
    }

    #[instrument(skip(self, candidate), fields(game_id = %candidate.id()))]
    fn commit_if_version_matches(
        &self,
        candidate: &Game,
        expected_version: u64,
    ) -> Result<Game, StoreError> {
        let id = candidate.id();
        let id_text = id.to_string();
        let expected = version_column(expected_version)?;
        let next = version_column(expected_version + 1)?;
        let mut conn = self.connection()?;

        let row = conn.immediate_transaction(|conn| -> Result<GameRow, StoreError> {
            let updated: Option<GameRow> = diesel::update(
                games::table
                    .filter(games::id.eq(id_text.as_str()))
                    .filter(games::version.eq(expected)),
            )
            .set((
                games::board.eq(candidate.board().to_string()),
                games::next_player.eq(candidate.next_player().to_string()),
                games::status.eq(candidate.status().to_string()),
                games::version.eq(next),
            ))
            .returning(GameRow::as_returning())
            .get_result(conn)
            .optional()?;

            if let Some(row) = updated {
                return Ok(row);
            }

            let actual: Option<i64> = games::table
                .filter(games::id.eq(id_text.as_str()))
                .select(games::version)
                .first(conn)
                .optional()?;

            match actual {
                None => Err(StoreError::NotFound(id)),
                Some(actual) => {
                    warn!(
                        expected = expected_version,
                        actual, "Version mismatch, commit rejected"
                    );
                    Err(StoreError::VersionConflict {
                        id,
                        expected: expected_version,
                        actual: u64::try_from(actual).unwrap_or_default(),
                    })
                }
            }
        })?;

        let committed = row.into_game()?;
        debug!(version = committed.version(), "Game committed");
        Ok(committed)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn overwrite(&self, game: &Game) -> Result<Game, StoreError> {
        let id = game.id();
        let id_text = id.to_string();
        let mut conn = self.connection()?;

        let row: Option<GameRow> =
            diesel::update(games::table.filter(games::id.eq(id_text.as_str())))
                .set((
                    games::board.eq(game.board().to_string()),
                    games::next_player.eq(game.next_player().to_string()),
                    games::status.eq(game.status().to_string()),
                    games::version.eq(games::version + 1_i64),
                ))
                .returning(GameRow::as_returning())
                .get_result(&mut *conn)
                .optional()?;

        let committed = row.ok_or(StoreError::NotFound(id))?.into_game()?;
        debug!(version = committed.version(), "Game overwritten");
        Ok(committed)
    }

    #[instrument(skip(self))]
    fn exists(&self, id: GameId) -> Result<bool, StoreError> {
        let id_text = id.to_string();
        let mut conn = self.connection()?;

        let found = diesel::select(diesel::dsl::exists(
            games::table.filter(games::id.eq(id_text.as_str())),
        ))
        .get_result::<bool>(&mut *conn)?;
        Ok(found)
    }

    #[instrument(skip(self))]
    fn delete(&self, id: GameId) -> Result<(), StoreError> {
        let id_text = id.to_string();
        let mut conn = self.connection()?;

        let removed = diesel::delete(games::table.filter(games::id.eq(id_text.as_str())))
            .execute(&mut *conn)?;

        if removed == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!("Game deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn page(&self, offset: u64, limit: u64) -> Result<StoredPage, StoreError> {
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self.connection()?;

        let total: i64 = games::table.count().get_result(&mut *conn)?;
        let rows = games::table
            .order(games::seq.asc())
            .limit(limit)
            .offset(offset)
            .select(GameRow::as_select())
            .load::<GameRow>(&mut *conn)?;

        let games = rows
            .into_iter()
            .map(GameRow::into_game)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = games.len(), total, "Page loaded");
        Ok(StoredPage::new(games, u64::try_from(total).unwrap_or_default()))
    }
}
