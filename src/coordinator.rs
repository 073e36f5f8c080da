//! Move application with optimistic concurrency, plus the game lifecycle.
//!
//! A move is applied as load → validate → compute → conditional commit. When
//! the commit loses to a concurrent writer the whole sequence restarts from a
//! fresh load, so the move is re-validated against the new position rather
//! than replayed onto a stale board.

use derive_getters::Getters;
use std::sync::Arc;
use std::time::Duration;
use tictac_board::{
    GameStatus, Player, has_won, is_draw, mark_of, opposite, set_at, to_index, within_bounds,
};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{GameError, InvalidMoveReason};
use crate::store::{GameStore, StoreError};
use crate::{Game, GameId};

/// How often and how patiently a move retries after losing a commit race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Total attempts per move, including the first.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// Pause between attempts.
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(10);

    /// Creates a policy. `max_attempts` is raised to at least 1.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Total attempts per move.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause between attempts.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BACKOFF)
    }
}

/// Bounds on list page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct PageLimits {
    default_size: u64,
    max_size: u64,
}

impl PageLimits {
    /// Creates page limits.
    pub fn new(default_size: u64, max_size: u64) -> Self {
        Self {
            default_size,
            max_size,
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(20, 100)
    }
}

/// One page of games.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GamePage {
    games: Vec<Game>,
    page: u64,
    size: u64,
    total_elements: u64,
    total_pages: u64,
}

/// Validates a move against `game` and builds the resulting game.
///
/// Checks run in a fixed order and the first failure wins: bounds, game
/// still in progress, turn, empty cell. The returned game keeps the id and
/// version of `game`; `game` itself is left untouched.
///
/// # Errors
///
/// Returns [`GameError::InvalidMove`] or [`GameError::GameFinished`].
#[instrument(skip(game), fields(game_id = %game.id(), version = game.version()))]
pub fn plan_move(game: &Game, row: i64, col: i64, player: Player) -> Result<Game, GameError> {
    if !within_bounds(row, col) {
        return Err(InvalidMoveReason::OutOfBounds { row, col }.into());
    }

    if game.status() != GameStatus::InProgress {
        return Err(GameError::GameFinished(game.status()));
    }

    if game.next_player() != player {
        return Err(InvalidMoveReason::WrongTurn {
            expected: game.next_player(),
            got: player,
        }
        .into());
    }

    let index = to_index(row as usize, col as usize);
    if !game.board().is_empty_at(index) {
        return Err(InvalidMoveReason::CellOccupied { row, col }.into());
    }

    let mark = mark_of(player);
    let board = set_at(game.board(), index, mark);

    // Win is checked before draw: a last move that fills the board and
    // completes a line is a win.
    let (status, next_player) = if has_won(&board, mark) {
        (GameStatus::won_by(player), player)
    } else if is_draw(&board) {
        (GameStatus::Draw, player)
    } else {
        (GameStatus::InProgress, opposite(player))
    };

    Ok(game.with_position(board, next_player, status))
}

/// Orchestrates game operations against a [`GameStore`].
#[derive(Clone)]
pub struct MoveCoordinator {
    store: Arc<dyn GameStore>,
    retry: RetryPolicy,
    page_limits: PageLimits,
}

impl std::fmt::Debug for MoveCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveCoordinator")
            .field("retry", &self.retry)
            .field("page_limits", &self.page_limits)
            .finish_non_exhaustive()
    }
}

impl MoveCoordinator {
    /// Creates a coordinator with the default retry policy and page limits.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        info!("Creating MoveCoordinator");
        Self {
            store,
            retry: RetryPolicy::default(),
            page_limits: PageLimits::default(),
        }
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the page limits.
    pub fn with_page_limits(mut self, page_limits: PageLimits) -> Self {
        self.page_limits = page_limits;
        self
    }

    /// Returns the retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Returns the page limits.
    pub fn page_limits(&self) -> PageLimits {
        self.page_limits
    }

    /// Creates and stores a new game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] if the store rejects the insert.
    #[instrument(skip(self))]
    pub fn create_new_game(&self) -> Result<Game, GameError> {
        info!("Creating new game");
        let game = self.store.insert(&Game::new())?;
        info!(game_id = %game.id(), "Created new game");
        Ok(game)
    }

    /// Applies `player`'s move at `(row, col)` and commits it.
    ///
    /// Retries from a fresh load when another writer commits first, up to
    /// the policy's attempt limit. Dropping the returned future between
    /// attempts abandons the move without any partial write.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`], [`GameError::InvalidMove`],
    /// [`GameError::GameFinished`], or [`GameError::ConcurrencyConflict`]
    /// once every attempt has lost a commit race.
    #[instrument(skip(self))]
    pub async fn make_move(
        &self,
        id: GameId,
        row: i64,
        col: i64,
        player: Player,
    ) -> Result<Game, GameError> {
        info!("Making move");
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let current = self.store.load(id)?;
            debug!(attempt, version = current.version(), board = %current.board(), "Loaded game");

            let candidate = plan_move(&current, row, col, player)?;

            match self
                .store
                .commit_if_version_matches(&candidate, current.version())
            {
                Ok(saved) => {
                    log_outcome(&saved, player);
                    return Ok(saved);
                }
                Err(StoreError::VersionConflict {
                    expected, actual, ..
                }) => {
                    warn!(attempt, expected, actual, "Optimistic lock conflict");
                    if attempt >= self.retry.max_attempts() {
                        error!(attempts = attempt, "Max retry attempts reached");
                        return Err(GameError::ConcurrencyConflict {
                            id,
                            attempts: attempt,
                        });
                    }
                    tokio::time::sleep(self.retry.backoff()).await;
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    /// Puts a game back in its initial position.
    ///
    /// The write is unconditional; the version still increments.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the game does not exist.
    #[instrument(skip(self))]
    pub fn reset_game(&self, id: GameId) -> Result<Game, GameError> {
        let game = self.store.load(id)?;
        let reset = self.store.overwrite(&game.cleared())?;
        info!(version = reset.version(), "Game reset");
        Ok(reset)
    }

    /// Deletes a game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the game does not exist.
    #[instrument(skip(self))]
    pub fn delete_game(&self, id: GameId) -> Result<(), GameError> {
        if !self.store.exists(id)? {
            warn!("Delete requested for unknown game");
            return Err(GameError::NotFound(id));
        }
        self.store.delete(id)?;
        info!("Game deleted");
        Ok(())
    }

    /// Fetches a game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotFound`] if the game does not exist.
    #[instrument(skip(self))]
    pub fn get_game(&self, id: GameId) -> Result<Game, GameError> {
        debug!("Fetching game");
        Ok(self.store.load(id)?)
    }

    /// Lists games in creation order, `size` per page, zero-based `page`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRequest`] if `size` is outside
    /// `[1, max_size]` or the offset overflows.
    #[instrument(skip(self))]
    pub fn list_games(&self, page: u64, size: u64) -> Result<GamePage, GameError> {
        let max_size = *self.page_limits.max_size();
        if size == 0 || size > max_size {
            return Err(GameError::InvalidRequest(format!(
                "Page size must be between 1 and {}, got {}",
                max_size, size
            )));
        }
        let offset = page.checked_mul(size).ok_or_else(|| {
            GameError::InvalidRequest(format!("Page {} is out of range", page))
        })?;

        let stored = self.store.page(offset, size)?;
        let total_elements = *stored.total();
        let total_pages = total_elements.div_ceil(size);
        debug!(
            count = stored.games().len(),
            total_elements, total_pages, "Games listed"
        );

        Ok(GamePage {
            games: stored.games().clone(),
            page,
            size,
            total_elements,
            total_pages,
        })
    }
}

fn log_outcome(game: &Game, mover: Player) {
    match game.status() {
        GameStatus::XWon | GameStatus::OWon => {
            info!(game_id = %game.id(), winner = %mover, "Game won");
        }
        GameStatus::Draw => info!(game_id = %game.id(), "Game ended in a draw"),
        GameStatus::InProgress => {}
    }
    info!(
        game_id = %game.id(),
        version = game.version(),
        "Move completed successfully\n{}",
        game.board().render_grid()
    );
}
