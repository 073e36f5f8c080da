//! Tests for the SQLite game store.

use std::sync::Arc;

use tempfile::NamedTempFile;

use tictac_arena::{
    Game, GameId, GameStatus, GameStore, MoveCoordinator, Player, SqliteGameStore, StoreError,
};

/// Creates a temporary database file and an open store on it. The file
/// handle must stay in scope to keep the file alive.
fn setup_test_db() -> (NamedTempFile, SqliteGameStore) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let store = SqliteGameStore::open(db_path).expect("Failed to open store");
    (db_file, store)
}

#[test]
fn test_insert_and_load() {
    let (_db, store) = setup_test_db();
    let game = Game::new();

    let inserted = store.insert(&game).expect("Insert failed");
    assert_eq!(inserted.id(), game.id());
    assert_eq!(inserted.version(), 0);

    let loaded = store.load(game.id()).expect("Load failed");
    assert_eq!(loaded.id(), game.id());
    assert_eq!(loaded.board().to_string(), "_________");
    assert_eq!(loaded.next_player(), Player::X);
    assert_eq!(loaded.status(), GameStatus::InProgress);
}

#[test]
fn test_load_missing() {
    let (_db, store) = setup_test_db();
    let id = GameId::new();
    assert_eq!(store.load(id), Err(StoreError::NotFound(id)));
    assert!(!store.exists(id).expect("Exists failed"));
}

#[test]
fn test_conditional_commit() {
    let (_db, store) = setup_test_db();
    let game = store.insert(&Game::new()).expect("Insert failed");

    let committed = store
        .commit_if_version_matches(&game, 0)
        .expect("Commit failed");
    assert_eq!(committed.version(), 1);

    let stale = store.commit_if_version_matches(&game, 0);
    assert_eq!(
        stale,
        Err(StoreError::VersionConflict {
            id: game.id(),
            expected: 0,
            actual: 1,
        })
    );
    assert_eq!(store.load(game.id()).expect("Load failed").version(), 1);
}

#[test]
fn test_commit_on_deleted_game() {
    let (_db, store) = setup_test_db();
    let game = store.insert(&Game::new()).expect("Insert failed");
    store.delete(game.id()).expect("Delete failed");

    assert_eq!(
        store.commit_if_version_matches(&game, 0),
        Err(StoreError::NotFound(game.id()))
    );
}

#[test]
fn test_conflict_across_connections() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let first = SqliteGameStore::open(db_path.clone()).expect("Open failed");
    let second = SqliteGameStore::open(db_path).expect("Open failed");

    let game = first.insert(&Game::new()).expect("Insert failed");
    let seen_by_second = second.load(game.id()).expect("Load failed");

    first
        .commit_if_version_matches(&game, 0)
        .expect("First commit failed");
    let result = second.commit_if_version_matches(&seen_by_second, seen_by_second.version());
    assert!(matches!(
        result,
        Err(StoreError::VersionConflict { actual: 1, .. })
    ));
}

#[test]
fn test_overwrite_bumps_version() {
    let (_db, store) = setup_test_db();
    let game = store.insert(&Game::new()).expect("Insert failed");

    let first = store.overwrite(&game).expect("Overwrite failed");
    let second = store.overwrite(&game).expect("Overwrite failed");
    assert_eq!(first.version(), 1);
    assert_eq!(second.version(), 2);

    let missing = Game::new();
    assert_eq!(
        store.overwrite(&missing),
        Err(StoreError::NotFound(missing.id()))
    );
}

#[test]
fn test_delete() {
    let (_db, store) = setup_test_db();
    let game = store.insert(&Game::new()).expect("Insert failed");

    assert!(store.exists(game.id()).expect("Exists failed"));
    store.delete(game.id()).expect("Delete failed");
    assert!(!store.exists(game.id()).expect("Exists failed"));
    assert_eq!(store.delete(game.id()), Err(StoreError::NotFound(game.id())));
}

#[test]
fn test_page_in_creation_order() {
    let (_db, store) = setup_test_db();
    let ids: Vec<GameId> = (0..5)
        .map(|_| store.insert(&Game::new()).expect("Insert failed").id())
        .collect();

    let page = store.page(2, 2).expect("Page failed");
    assert_eq!(*page.total(), 5);
    let got: Vec<GameId> = page.games().iter().map(Game::id).collect();
    assert_eq!(got, vec![ids[2], ids[3]]);

    let tail = store.page(4, 10).expect("Page failed");
    assert_eq!(tail.games().len(), 1);
}

#[test]
fn test_in_memory_database() {
    let store = SqliteGameStore::open(":memory:".to_string()).expect("Open failed");
    let game = store.insert(&Game::new()).expect("Insert failed");
    assert_eq!(store.load(game.id()).expect("Load failed").version(), 0);
}

#[tokio::test]
async fn test_full_game_persists() {
    let (db, store) = setup_test_db();
    let coordinator = MoveCoordinator::new(Arc::new(store));
    let id = coordinator.create_new_game().expect("Create failed").id();

    let mut player = Player::X;
    for (row, col) in [(0, 0), (1, 1), (0, 1), (1, 2), (0, 2)] {
        coordinator
            .make_move(id, row, col, player)
            .await
            .expect("Move failed");
        player = player.opponent();
    }

    let db_path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = SqliteGameStore::open(db_path).expect("Reopen failed");
    let game = reopened.load(id).expect("Load failed");
    assert_eq!(game.board().to_string(), "XXX_OO___");
    assert_eq!(game.status(), GameStatus::XWon);
    assert_eq!(game.version(), 5);
}
