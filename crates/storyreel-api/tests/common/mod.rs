//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http_body_util::BodyExt;
use storyreel_blob_store::memory_blob_store::InMemoryBlobStore;
use storyreel_core::clock::Clock;
use storyreel_playback::config::PlaybackConfig;
use tower::ServiceExt;

use storyreel_api::runtime::{PlaybackHandle, RuntimeClock};
use storyreel_api::state::AppState;

/// Upload limit used across integration tests.
pub const MAX_IMAGE_BYTES: usize = 4096;

/// A tiny PNG signature, enough to stand in for an image.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Build application state backed by an in-memory blob store and a playback
/// task on the tokio clock.
pub fn build_test_state() -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(RuntimeClock::new());
    let playback = PlaybackHandle::spawn(
        PlaybackConfig::default(),
        Duration::from_millis(16),
        Arc::clone(&clock),
    );
    AppState::new(
        playback,
        Arc::new(InMemoryBlobStore::new()),
        clock,
        MAX_IMAGE_BYTES,
    )
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    storyreel_api::build_router(state)
}

/// JSON body for a story upload.
pub fn upload_body(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "content_type": "image/png",
        "image_base64": STANDARD.encode(PNG_BYTES),
    })
}

/// Upload a story and return its index.
pub async fn add_story(state: &AppState, title: &str) -> u64 {
    let (status, json) = post_json(
        build_test_app(state.clone()),
        "/api/v1/stories",
        &upload_body(title),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["index"].as_u64().unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
