//! Query handlers for the Stories context.
//!
//! Read-only views over the story sequence, shaped for the thumbnail strip
//! and for a single-story lookup.

use std::sync::Arc;

use serde::Serialize;
use storyreel_core::blob::{BlobRef, BlobStore, ImageBlob};
use storyreel_core::error::DomainError;

use crate::domain::story::StoryStore;

/// One entry of the thumbnail strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryThumbnail {
    /// Position in the sequence; clicking opens playback here.
    pub index: usize,
    /// Title or fallback label, also used as the accessible name.
    pub label: String,
    /// The story image.
    pub image: BlobRef,
}

/// Read-only view of a single story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryView {
    /// Position in the sequence.
    pub index: usize,
    /// The title as stored (possibly empty).
    pub title: String,
    /// Title or fallback label.
    pub label: String,
    /// The story image.
    pub image: BlobRef,
}

/// Lists every story in display order.
#[must_use]
pub fn list_thumbnails(store: &StoryStore) -> Vec<StoryThumbnail> {
    store
        .iter()
        .map(|(index, story)| StoryThumbnail {
            index,
            label: story.label(index),
            image: story.image(),
        })
        .collect()
}

/// Retrieves a story by position.
///
/// # Errors
///
/// Returns `DomainError::StoryNotFound` if no story exists at `index`.
pub fn get_story(store: &StoryStore, index: usize) -> Result<StoryView, DomainError> {
    let story = store.get(index)?;
    Ok(StoryView {
        index,
        title: story.title().to_owned(),
        label: story.label(index),
        image: story.image(),
    })
}

/// Loads the image bytes for a story image reference.
///
/// # Errors
///
/// Returns `DomainError::BlobNotFound` if the blob is gone, or whatever the
/// blob store reports.
pub async fn load_image(
    blob_ref: BlobRef,
    blob_store: &dyn BlobStore,
) -> Result<Arc<ImageBlob>, DomainError> {
    blob_store.get(blob_ref).await
}
