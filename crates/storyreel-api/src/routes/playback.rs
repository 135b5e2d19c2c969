//! Routes for story playback.
//!
//! Every command answers with the snapshot taken right after it ran. Requests
//! that do not apply (navigating while closed, opening past the end) are
//! no-ops and still return `200` with the unchanged snapshot.

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Deserialize;
use storyreel_core::command::Command;
use storyreel_playback::commands::{PlaybackAction, PlaybackCommand};
use storyreel_playback::input::Key;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::renderer::PlaybackSnapshot;
use crate::state::AppState;

/// Request body for POST /open.
#[derive(Debug, Deserialize)]
pub struct OpenRequest {
    /// Story to open.
    pub index: usize,
}

/// Request body for POST /keys.
#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    /// DOM-style key name, e.g. `"ArrowRight"`.
    pub key: String,
}

/// GET /
async fn snapshot(State(state): State<AppState>) -> Json<PlaybackSnapshot> {
    Json(state.playback.snapshot())
}

/// POST /open
#[instrument(skip(state, request), fields(index = request.index))]
async fn open(
    State(state): State<AppState>,
    Json(request): Json<OpenRequest>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    dispatch(&state, PlaybackAction::OpenAt(request.index)).await
}

/// POST /next
#[instrument(skip(state))]
async fn next(State(state): State<AppState>) -> Result<Json<PlaybackSnapshot>, ApiError> {
    dispatch(&state, PlaybackAction::Next).await
}

/// POST /previous
#[instrument(skip(state))]
async fn previous(State(state): State<AppState>) -> Result<Json<PlaybackSnapshot>, ApiError> {
    dispatch(&state, PlaybackAction::Previous).await
}

/// POST /close
#[instrument(skip(state))]
async fn close(State(state): State<AppState>) -> Result<Json<PlaybackSnapshot>, ApiError> {
    dispatch(&state, PlaybackAction::Close).await
}

/// POST /keys
#[instrument(skip(state, request), fields(key = %request.key))]
async fn key(
    State(state): State<AppState>,
    Json(request): Json<KeyRequest>,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    let key = Key::from(request.key.as_str());
    dispatch(&state, PlaybackAction::Key(key)).await
}

async fn dispatch(
    state: &AppState,
    action: PlaybackAction,
) -> Result<Json<PlaybackSnapshot>, ApiError> {
    let command = PlaybackCommand::new(action);

    info!(
        correlation_id = %command.correlation_id,
        command_type = command.command_type(),
        "handling playback command"
    );

    let snapshot = state.playback.execute(command).await?;
    Ok(Json(snapshot))
}

/// Returns the router for playback.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(snapshot))
        .route("/open", post(open))
        .route("/next", post(next))
        .route("/previous", post(previous))
        .route("/close", post(close))
        .route("/keys", post(key))
}
