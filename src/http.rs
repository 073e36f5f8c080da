//! HTTP API over the move coordinator.
//!
//! Routes live under `/api/v1/games`. Bodies are JSON with camelCase fields;
//! every failure is answered with `{"error": KIND, "message": text}`.

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tictac_board::{Board, GameStatus, Player};
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

use crate::coordinator::{GamePage, MoveCoordinator};
use crate::error::{ErrorKind, GameError};
use crate::{Game, GameId};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    coordinator: Arc<MoveCoordinator>,
}

impl AppState {
    /// Wraps a coordinator for sharing across requests.
    pub fn new(coordinator: MoveCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }

    /// Returns the coordinator.
    pub fn coordinator(&self) -> &MoveCoordinator {
        &self.coordinator
    }
}

/// Game as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    /// Game id.
    pub game_id: GameId,
    /// Nine-character board, row-major, `_` for empty.
    pub board: Board,
    /// Player to move.
    pub next_player: Player,
    /// Game status.
    pub status: GameStatus,
    /// Commit counter.
    pub version: u64,
    /// Creation time (UTC).
    pub created_at: NaiveDateTime,
}

impl From<&Game> for GameResponse {
    fn from(game: &Game) -> Self {
        Self {
            game_id: game.id(),
            board: *game.board(),
            next_player: game.next_player(),
            status: game.status(),
            version: game.version(),
            created_at: game.created_at(),
        }
    }
}

/// Body of a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Row, 0 to 2.
    pub row: i64,
    /// Column, 0 to 2.
    pub col: i64,
    /// Mover.
    pub player: Player,
}

/// Pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Zero-based page number.
    pub page: Option<u64>,
    /// Games per page.
    pub size: Option<u64>,
}

/// One page of games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    /// Games on this page.
    pub content: Vec<GameResponse>,
    /// Zero-based page number.
    pub page: u64,
    /// Requested page size.
    pub size: u64,
    /// Games stored in total.
    pub total_elements: u64,
    /// Pages needed to list every game.
    pub total_pages: u64,
}

impl From<GamePage> for PageResponse {
    fn from(page: GamePage) -> Self {
        Self {
            content: page.games().iter().map(GameResponse::from).collect(),
            page: *page.page(),
            size: *page.size(),
            total_elements: *page.total_elements(),
            total_pages: *page.total_pages(),
        }
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable kind, e.g. `GAME_NOT_FOUND`.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
}

impl GameError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::GameNotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidMove | ErrorKind::GameFinished | ErrorKind::InvalidRequest => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::ConcurrencyConflict => StatusCode::CONFLICT,
            ErrorKind::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            debug!(error = %self, status = %status, "Request rejected");
        }
        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the API router.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    info!("Building HTTP router");
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/games", post(create_game).get(list_games))
        .route("/api/v1/games/{id}", get(get_game).delete(delete_game))
        .route("/api/v1/games/{id}/moves", post(make_move))
        .route("/api/v1/games/{id}/reset", post(reset_game))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

fn parse_id(raw: &str) -> Result<GameId, GameError> {
    raw.parse()
        .map_err(|e| GameError::InvalidRequest(format!("Invalid game id '{}': {}", raw, e)))
}

/// Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GameResponse>), GameError> {
    let game = state.coordinator().create_new_game()?;
    Ok((StatusCode::CREATED, Json(GameResponse::from(&game))))
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, GameError> {
    let game = state.coordinator().get_game(parse_id(&id)?)?;
    Ok(Json(GameResponse::from(&game)))
}

#[instrument(skip(state, query))]
async fn list_games(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<PageResponse>, GameError> {
    let Query(query) = query.map_err(|e| GameError::InvalidRequest(e.body_text()))?;
    let coordinator = state.coordinator();
    let page = query.page.unwrap_or(0);
    let size = query
        .size
        .unwrap_or(*coordinator.page_limits().default_size());
    let listed = coordinator.list_games(page, size)?;
    Ok(Json(PageResponse::from(listed)))
}

#[instrument(skip(state, body))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, GameError> {
    let id = parse_id(&id)?;
    let Json(request) = body.map_err(|e| {
        warn!(error = %e, "Rejected move body");
        GameError::InvalidRequest(e.body_text())
    })?;
    let game = state
        .coordinator()
        .make_move(id, request.row, request.col, request.player)
        .await?;
    Ok(Json(GameResponse::from(&game)))
}

#[instrument(skip(state))]
async fn reset_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, GameError> {
    let game = state.coordinator().reset_game(parse_id(&id)?)?;
    Ok(Json(GameResponse::from(&game)))
}

#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, GameError> {
    state.coordinator().delete_game(parse_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}
