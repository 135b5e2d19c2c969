//! Routes for the Stories bounded context.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use storyreel_core::error::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use storyreel_stories::application::command_handlers;
use storyreel_stories::application::query_handlers::{self, StoryThumbnail, StoryView};
use storyreel_stories::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
///
/// `image_base64` holds either plain base64 or a `data:<type>;base64,...`
/// URL. A data URL supplies the content type when `content_type` is blank.
#[derive(Deserialize)]
pub struct AddStoryRequest {
    /// Optional title; blank titles fall back to `"Story N"`.
    #[serde(default)]
    pub title: String,
    /// MIME type of the image.
    #[serde(default)]
    pub content_type: String,
    /// The encoded image, absent when nothing was selected.
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// Response body returned after a story is added.
#[derive(Debug, Serialize)]
pub struct AddStoryResponse {
    /// Position of the new story.
    pub index: usize,
}

/// POST /
#[instrument(skip(state, request), fields(title = %request.title))]
async fn add_story(
    State(state): State<AppState>,
    Json(request): Json<AddStoryRequest>,
) -> Result<Json<AddStoryResponse>, ApiError> {
    let mut content_type = request.content_type;
    let image = match request.image_base64.as_deref() {
        Some(encoded) => {
            let (declared, payload) = split_data_url(encoded);
            if let Some(declared) = declared.filter(|_| content_type.trim().is_empty()) {
                content_type = declared.to_string();
            }
            Some(decode_image(payload)?)
        }
        None => None,
    };

    let command = commands::AddStory {
        correlation_id: Uuid::new_v4(),
        title: request.title,
        content_type,
        image,
    };

    info!(correlation_id = %command.correlation_id, "handling add_story command");

    let story = command_handlers::handle_add_story(
        command,
        state.max_image_bytes,
        state.clock.as_ref(),
        &*state.blob_store,
    )
    .await?;
    let index = state.playback.append(story).await?;

    Ok(Json(AddStoryResponse { index }))
}

/// GET /
#[instrument(skip(state))]
async fn list_stories(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoryThumbnail>>, ApiError> {
    let thumbnails = state
        .playback
        .query_stories(query_handlers::list_thumbnails)
        .await?;
    Ok(Json(thumbnails))
}

/// GET /{index}
#[instrument(skip(state))]
async fn get_story(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<StoryView>, ApiError> {
    let view = lookup(&state, index).await?;
    Ok(Json(view))
}

/// GET /{index}/image
#[instrument(skip(state))]
async fn get_story_image(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Response, ApiError> {
    let view = lookup(&state, index).await?;
    let blob = query_handlers::load_image(view.image, &*state.blob_store).await?;

    Ok((
        [(header::CONTENT_TYPE, blob.content_type.clone())],
        blob.bytes.clone(),
    )
        .into_response())
}

async fn lookup(state: &AppState, index: usize) -> Result<StoryView, DomainError> {
    state
        .playback
        .query_stories(move |stories| query_handlers::get_story(stories, index))
        .await?
}

/// Splits `data:<type>;base64,<payload>` into its type and payload. Anything
/// else is treated as a bare payload.
fn split_data_url(encoded: &str) -> (Option<&str>, &str) {
    let Some(rest) = encoded.strip_prefix("data:") else {
        return (None, encoded);
    };
    match rest.split_once(',') {
        Some((meta, payload)) => {
            let declared = meta.strip_suffix(";base64").unwrap_or(meta);
            (Some(declared).filter(|t| !t.is_empty()), payload)
        }
        None => (None, encoded),
    }
}

fn decode_image(payload: &str) -> Result<Vec<u8>, DomainError> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| DomainError::Validation(format!("image_base64 is not valid base64: {e}")))
}

/// Returns the router for the stories context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stories).post(add_story))
        .route("/{index}", get(get_story))
        .route("/{index}/image", get(get_story_image))
}
