//! Persistence for game records.
//!
//! The coordinator only sees the [`GameStore`] trait. Every write that
//! depends on what was read goes through
//! [`GameStore::commit_if_version_matches`], which must check the version and
//! write in one indivisible step.

mod error;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::{DbError, StoreError};
pub use memory::InMemoryGameStore;
pub use sqlite::SqliteGameStore;

use derive_getters::Getters;
use derive_new::new;

use crate::{Game, GameId};

/// A slice of stored games in creation order, plus the total count.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct StoredPage {
    games: Vec<Game>,
    total: u64,
}

/// Storage collaborator for versioned games.
///
/// Implementations are shared across concurrent requests.
pub trait GameStore: Send + Sync {
    /// Stores a new game as given (version 0) and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the write fails.
    fn insert(&self, game: &Game) -> Result<Game, StoreError>;

    /// Loads the current snapshot of a game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no game has this id.
    fn load(&self, id: GameId) -> Result<Game, StoreError>;

    /// Writes `candidate` only if the stored version still equals
    /// `expected_version`, bumping the version by one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VersionConflict`] if another writer committed
    /// first, or [`StoreError::NotFound`] if the game was deleted.
    fn commit_if_version_matches(
        &self,
        candidate: &Game,
        expected_version: u64,
    ) -> Result<Game, StoreError>;

    /// Writes `game` regardless of the stored version, bumping the version by one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no game has this id.
    fn overwrite(&self, game: &Game) -> Result<Game, StoreError>;

    /// Checks whether a game is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the lookup fails.
    fn exists(&self, id: GameId) -> Result<bool, StoreError>;

    /// Removes a game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no game has this id.
    fn delete(&self, id: GameId) -> Result<(), StoreError>;

    /// Returns up to `limit` games starting at `offset`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the query fails.
    fn page(&self, offset: u64, limit: u64) -> Result<StoredPage, StoreError>;
}
