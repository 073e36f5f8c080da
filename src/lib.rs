//! Tic-tac-toe arena - concurrent game server
//!
//! Games are stored as versioned records. A move is validated against the
//! loaded snapshot and committed only if nobody else committed in between;
//! losers of that race retry from a fresh load.
//!
//! # Architecture
//!
//! - **Board engine** ([`tictac_board`]): pure board, win and draw rules
//! - **Coordinator**: move validation, optimistic retry, game lifecycle
//! - **Store**: in-memory or SQLite persistence with conditional commits
//! - **HTTP**: axum routes under `/api/v1/games`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tictac_arena::{InMemoryGameStore, MoveCoordinator, Player};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let coordinator = MoveCoordinator::new(Arc::new(InMemoryGameStore::new()));
//! let game = coordinator.create_new_game()?;
//! let game = coordinator.make_move(game.id(), 1, 1, Player::X).await?;
//! assert_eq!(game.version(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod coordinator;
mod error;
mod game;
mod http;
mod store;

// Crate-level exports - Configuration
pub use config::{ArenaConfig, ConfigError, StorageKind};

// Crate-level exports - Coordinator
pub use coordinator::{GamePage, MoveCoordinator, PageLimits, RetryPolicy, plan_move};

// Crate-level exports - Errors
pub use error::{ErrorKind, GameError, InvalidMoveReason};

// Crate-level exports - Game record
pub use game::{Game, GameId};

// Crate-level exports - HTTP adapter
pub use http::{
    AppState, ErrorResponse, GameResponse, HealthResponse, MoveRequest, PageQuery, PageResponse,
    router,
};

// Crate-level exports - Storage
pub use store::{DbError, GameStore, InMemoryGameStore, SqliteGameStore, StoreError, StoredPage};

// Crate-level exports - Board types
pub use tictac_board::{Board, Cell, GameStatus, Mark, Player};
