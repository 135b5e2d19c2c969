//! Storyreel API server entry point.

use std::sync::Arc;

use storyreel_api::config::ServerConfig;
use storyreel_api::error::AppError;
use storyreel_api::runtime::{PlaybackHandle, RuntimeClock};
use storyreel_api::state::AppState;
use storyreel_blob_store::memory_blob_store::InMemoryBlobStore;
use storyreel_core::clock::Clock;
use storyreel_playback::config::PlaybackConfig;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Storyreel API server");

    // Read configuration from environment.
    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;

    // Build application state. Stories and images live for the process only.
    let clock: Arc<dyn Clock> = Arc::new(RuntimeClock::new());
    let playback = PlaybackHandle::spawn(
        PlaybackConfig::default(),
        config.frame_interval,
        Arc::clone(&clock),
    );
    let app_state = AppState::new(
        playback,
        Arc::new(InMemoryBlobStore::new()),
        clock,
        config.max_image_bytes,
    );

    // Build router.
    let app = storyreel_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
