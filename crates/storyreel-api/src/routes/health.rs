//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the playback task is unreachable.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Number of stories uploaded this session, when known.
    pub stories: Option<usize>,
    /// Whether the viewer is open.
    pub playback_open: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let stories = match state.playback.query_stories(|stories| stories.len()).await {
        Ok(len) => Some(len),
        Err(err) => {
            warn!(error = %err, "health check could not reach playback task");
            None
        }
    };

    Json(HealthResponse {
        status: if stories.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        stories,
        playback_open: state.playback.snapshot().is_open,
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
