//! Shared application state.

use std::sync::Arc;

use storyreel_core::blob::BlobStore;
use storyreel_core::clock::Clock;

use crate::runtime::PlaybackHandle;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the task that owns playback and the story sequence.
    pub playback: PlaybackHandle,
    /// Storage for uploaded images.
    pub blob_store: Arc<dyn BlobStore>,
    /// Clock used to stamp stored images.
    pub clock: Arc<dyn Clock>,
    /// Largest accepted image upload, in decoded bytes.
    pub max_image_bytes: usize,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        playback: PlaybackHandle,
        blob_store: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
        max_image_bytes: usize,
    ) -> Self {
        Self {
            playback,
            blob_store,
            clock,
            max_image_bytes,
        }
    }
}
