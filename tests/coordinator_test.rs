//! Tests for game lifecycle operations through the coordinator.

use std::sync::Arc;

use tictac_arena::{
    ErrorKind, GameError, GameId, GameStatus, InMemoryGameStore, InvalidMoveReason,
    MoveCoordinator, Player,
};

fn coordinator() -> MoveCoordinator {
    MoveCoordinator::new(Arc::new(InMemoryGameStore::new()))
}

/// Plays `moves` in order, alternating X and O starting with X.
async fn play(coordinator: &MoveCoordinator, id: GameId, moves: &[(i64, i64)]) {
    let mut player = Player::X;
    for &(row, col) in moves {
        coordinator
            .make_move(id, row, col, player)
            .await
            .expect("Move failed");
        player = player.opponent();
    }
}

#[tokio::test]
async fn test_create_new_game() {
    let coordinator = coordinator();
    let game = coordinator.create_new_game().expect("Create failed");

    assert_eq!(game.board().to_string(), "_________");
    assert_eq!(game.next_player(), Player::X);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.version(), 0);

    let fetched = coordinator.get_game(game.id()).expect("Get failed");
    assert_eq!(fetched, game);
}

#[tokio::test]
async fn test_first_move() {
    let coordinator = coordinator();
    let game = coordinator.create_new_game().expect("Create failed");

    let after = coordinator
        .make_move(game.id(), 0, 0, Player::X)
        .await
        .expect("Move failed");

    assert_eq!(after.board().to_string(), "X________");
    assert_eq!(after.next_player(), Player::O);
    assert_eq!(after.status(), GameStatus::InProgress);
    assert_eq!(after.version(), 1);
}

#[tokio::test]
async fn test_x_wins_top_row() {
    let coordinator = coordinator();
    let id = coordinator.create_new_game().expect("Create failed").id();

    play(&coordinator, id, &[(0, 0), (1, 1), (0, 1), (1, 2)]).await;
    let won = coordinator
        .make_move(id, 0, 2, Player::X)
        .await
        .expect("Winning move failed");

    assert_eq!(won.board().to_string(), "XXX_OO___");
    assert_eq!(won.status(), GameStatus::XWon);
    assert_eq!(won.next_player(), Player::X);
    assert_eq!(won.version(), 5);
}

#[tokio::test]
async fn test_wrong_turn_leaves_game_unchanged() {
    let coordinator = coordinator();
    let id = coordinator.create_new_game().expect("Create failed").id();
    play(&coordinator, id, &[(0, 0)]).await;

    let err = coordinator
        .make_move(id, 1, 1, Player::X)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidMove(InvalidMoveReason::WrongTurn {
            expected: Player::O,
            got: Player::X,
        })
    );
    assert_eq!(err.to_string(), "Invalid turn. Expected: O, got: X");

    let game = coordinator.get_game(id).expect("Get failed");
    assert_eq!(game.board().to_string(), "X________");
    assert_eq!(game.version(), 1);
}

#[tokio::test]
async fn test_occupied_cell_rejected() {
    let coordinator = coordinator();
    let id = coordinator.create_new_game().expect("Create failed").id();
    play(&coordinator, id, &[(1, 1)]).await;

    let err = coordinator
        .make_move(id, 1, 1, Player::O)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GameError::InvalidMove(InvalidMoveReason::CellOccupied { row: 1, col: 1 })
    );
}

#[tokio::test]
async fn test_out_of_bounds_rejected() {
    let coordinator = coordinator();
    let id = coordinator.create_new_game().expect("Create failed").id();

    for (row, col) in [(3, 0), (0, 3), (-1, 0), (0, -1)] {
        let err = coordinator
            .make_move(id, row, col, Player::X)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMove, "({}, {})", row, col);
    }
    assert_eq!(coordinator.get_game(id).expect("Get failed").version(), 0);
}

#[tokio::test]
async fn test_move_on_finished_game() {
    let coordinator = coordinator();
    let id = coordinator.create_new_game().expect("Create failed").id();
    play(&coordinator, id, &[(0, 0), (1, 1), (0, 1), (1, 2), (0, 2)]).await;

    let err = coordinator
        .make_move(id, 2, 2, Player::O)
        .await
        .unwrap_err();
    assert_eq!(err, GameError::GameFinished(GameStatus::XWon));
    assert_eq!(err.to_string(), "Game already finished with status: X_WON");
}

#[tokio::test]
async fn test_draw() {
    let coordinator = coordinator();
    let id = coordinator.create_new_game().expect("Create failed").id();

    play(
        &coordinator,
        id,
        &[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ],
    )
    .await;

    let game = coordinator.get_game(id).expect("Get failed");
    assert_eq!(game.board().to_string(), "XOXXOOOXX");
    assert_eq!(game.status(), GameStatus::Draw);
    assert_eq!(game.version(), 9);
}

#[tokio::test]
async fn test_reset_clears_board_and_bumps_version() {
    let coordinator = coordinator();
    let game = coordinator.create_new_game().expect("Create failed");
    let id = game.id();
    play(&coordinator, id, &[(0, 0), (1, 1), (0, 1), (1, 2), (0, 2)]).await;

    let reset = coordinator.reset_game(id).expect("Reset failed");
    assert_eq!(reset.board().to_string(), "_________");
    assert_eq!(reset.next_player(), Player::X);
    assert_eq!(reset.status(), GameStatus::InProgress);
    assert_eq!(reset.version(), 6);
    assert_eq!(reset.created_at(), game.created_at());

    let again = coordinator.reset_game(id).expect("Second reset failed");
    assert_eq!(again.board(), reset.board());
    assert_eq!(again.status(), reset.status());
    assert_eq!(again.version(), 7);

    coordinator
        .make_move(id, 2, 2, Player::X)
        .await
        .expect("Move after reset failed");
}

#[tokio::test]
async fn test_get_is_idempotent() {
    let coordinator = coordinator();
    let id = coordinator.create_new_game().expect("Create failed").id();
    play(&coordinator, id, &[(2, 0)]).await;

    let first = coordinator.get_game(id).expect("Get failed");
    let second = coordinator.get_game(id).expect("Get failed");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_game() {
    let coordinator = coordinator();
    let id = GameId::new();

    assert_eq!(coordinator.get_game(id), Err(GameError::NotFound(id)));
    assert_eq!(coordinator.reset_game(id), Err(GameError::NotFound(id)));
    assert_eq!(coordinator.delete_game(id), Err(GameError::NotFound(id)));
    assert_eq!(
        coordinator.make_move(id, 0, 0, Player::X).await,
        Err(GameError::NotFound(id))
    );
}

#[tokio::test]
async fn test_delete_game() {
    let coordinator = coordinator();
    let id = coordinator.create_new_game().expect("Create failed").id();

    coordinator.delete_game(id).expect("Delete failed");
    assert_eq!(coordinator.get_game(id), Err(GameError::NotFound(id)));
    assert_eq!(coordinator.delete_game(id), Err(GameError::NotFound(id)));
}

#[test]
fn test_list_games_pages_in_creation_order() {
    let coordinator = coordinator();
    let ids: Vec<GameId> = (0..5)
        .map(|_| coordinator.create_new_game().expect("Create failed").id())
        .collect();

    let first = coordinator.list_games(0, 2).expect("List failed");
    assert_eq!(*first.total_elements(), 5);
    assert_eq!(*first.total_pages(), 3);
    let got: Vec<GameId> = first.games().iter().map(|g| g.id()).collect();
    assert_eq!(got, ids[0..2]);

    let last = coordinator.list_games(2, 2).expect("List failed");
    assert_eq!(last.games().len(), 1);
    assert_eq!(last.games()[0].id(), ids[4]);

    let beyond = coordinator.list_games(7, 2).expect("List failed");
    assert!(beyond.games().is_empty());
    assert_eq!(*beyond.total_elements(), 5);
}

#[test]
fn test_list_games_rejects_bad_size() {
    let coordinator = coordinator();
    for size in [0, 101] {
        let err = coordinator.list_games(0, size).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest, "size {}", size);
    }
    assert!(coordinator.list_games(0, 100).is_ok());
}

#[test]
fn test_list_empty_store() {
    let page = coordinator().list_games(0, 20).expect("List failed");
    assert!(page.games().is_empty());
    assert_eq!(*page.total_elements(), 0);
    assert_eq!(*page.total_pages(), 0);
}
