//! Storyreel HTTP host.
//!
//! Runs the playback controller inside a single tokio task and exposes story
//! upload, story queries and playback input over JSON.

pub mod config;
pub mod error;
pub mod renderer;
pub mod routes;
pub mod runtime;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;

use crate::state::AppState;

/// Room for JSON framing and the title around the encoded image.
const BODY_OVERHEAD: usize = 64 * 1024;

/// Builds the application router with every route mounted.
pub fn build_router(state: AppState) -> Router {
    // Base64 grows the payload by a third.
    let body_limit = state.max_image_bytes.saturating_mul(4) / 3 + BODY_OVERHEAD;

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/stories", routes::stories::router())
        .nest("/api/v1/playback", routes::playback::router())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
