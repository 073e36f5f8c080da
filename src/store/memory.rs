//! In-process game store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::store::{DbError, GameStore, StoreError, StoredPage};
use crate::{Game, GameId};

#[derive(Debug, Default)]
struct Inner {
    games: HashMap<GameId, Game>,
    /// Ids in insertion order, for paging.
    order: Vec<GameId>,
}

/// Game store backed by a mutex-guarded map.
///
/// Each call holds the lock for its whole duration, so version checks and
/// writes are atomic with respect to each other. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGameStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryGameStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend(DbError::new("In-memory game store lock poisoned")))
    }
}

impl GameStore for InMemoryGameStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn insert(&self, game: &Game) -> Result<Game, StoreError> {
        let mut inner = self.lock()?;
        if inner.games.contains_key(&game.id()) {
            return Err(StoreError::Backend(DbError::new(format!(
                "Game {} already exists",
                game.id()
            ))));
        }
        inner.games.insert(game.id(), game.clone());
        inner.order.push(game.id());
        debug!("Game inserted");
        Ok(game.clone())
    }

    #[instrument(skip(self))]
    fn load(&self, id: GameId) -> Result<Game, StoreError> {
        let inner = self.lock()?;
        inner.games.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self, candidate), fields(game_id = %candidate.id()))]
    fn commit_if_version_matches(
        &self,
        candidate: &Game,
        expected_version: u64,
    ) -> Result<Game, StoreError> {
        let mut inner = self.lock()?;
        let id = candidate.id();
        let stored = inner.games.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if stored.version() != expected_version {
            warn!(
                expected = expected_version,
                actual = stored.version(),
                "Version mismatch, commit rejected"
            );
            return Err(StoreError::VersionConflict {
                id,
                expected: expected_version,
                actual: stored.version(),
            });
        }

        let committed = candidate.with_version(expected_version + 1);
        *stored = committed.clone();
        debug!(version = committed.version(), "Game committed");
        Ok(committed)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn overwrite(&self, game: &Game) -> Result<Game, StoreError> {
        let mut inner = self.lock()?;
        let id = game.id();
        let stored = inner.games.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let committed = game.with_version(stored.version() + 1);
        *stored = committed.clone();
        debug!(version = committed.version(), "Game overwritten");
        Ok(committed)
    }

    #[instrument(skip(self))]
    fn exists(&self, id: GameId) -> Result<bool, StoreError> {
        Ok(self.lock()?.games.contains_key(&id))
    }

    #[instrument(skip(self))]
    fn delete(&self, id: GameId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.games.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        inner.order.retain(|existing| *existing != id);
        debug!("Game deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn page(&self, offset: u64, limit: u64) -> Result<StoredPage, StoreError> {
        let inner = self.lock()?;
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let games: Vec<Game> = inner
            .order
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|id| inner.games.get(id).cloned())
            .collect();

        debug!(count = games.len(), total = inner.order.len(), "Page loaded");
        Ok(StoredPage::new(games, inner.order.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_bumps_version() {
        let store = InMemoryGameStore::new();
        let game = store.insert(&Game::new()).expect("Insert failed");

        let committed = store
            .commit_if_version_matches(&game, 0)
            .expect("Commit failed");
        assert_eq!(committed.version(), 1);
        assert_eq!(store.load(game.id()).expect("Load failed").version(), 1);
    }

    #[test]
    fn test_stale_commit_rejected() {
        let store = InMemoryGameStore::new();
        let game = store.insert(&Game::new()).expect("Insert failed");
        store
            .commit_if_version_matches(&game, 0)
            .expect("First commit failed");

        let result = store.commit_if_version_matches(&game, 0);
        assert_eq!(
            result,
            Err(StoreError::VersionConflict {
                id: game.id(),
                expected: 0,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_page_keeps_insertion_order() {
        let store = InMemoryGameStore::new();
        let ids: Vec<GameId> = (0..5)
            .map(|_| store.insert(&Game::new()).expect("Insert failed").id())
            .collect();

        store.delete(ids[1]).expect("Delete failed");

        let page = store.page(1, 2).expect("Page failed");
        assert_eq!(*page.total(), 4);
        let got: Vec<GameId> = page.games().iter().map(Game::id).collect();
        assert_eq!(got, vec![ids[2], ids[3]]);
    }
}
