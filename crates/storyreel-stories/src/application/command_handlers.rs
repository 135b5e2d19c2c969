//! Command handlers for the Stories context.
//!
//! Ingestion turns a submitted upload into a [`Story`] that the playback
//! controller can append. Nothing is mutated when validation fails.

use storyreel_core::blob::{BlobStore, ImageBlob};
use storyreel_core::clock::Clock;
use storyreel_core::command::Command;
use storyreel_core::error::DomainError;
use tracing::{debug, info};

use crate::domain::commands::AddStory;
use crate::domain::story::Story;

/// Feedback shown when the user submits without choosing a file.
pub const MISSING_IMAGE_MESSAGE: &str = "Please select a file";

/// Handles the `AddStory` command: validates the upload, stores the image
/// bytes, and returns the story to append.
///
/// The title is trimmed here, at the form boundary. The story store itself
/// keeps whatever it is given.
///
/// # Errors
///
/// Returns `DomainError::MissingInput` if no image (or an empty one) was
/// submitted, `DomainError::Validation` if the content type is not an image
/// or the image exceeds `max_image_bytes`, and whatever the blob store
/// returns if storing fails.
pub async fn handle_add_story(
    command: AddStory,
    max_image_bytes: usize,
    clock: &dyn Clock,
    blob_store: &dyn BlobStore,
) -> Result<Story, DomainError> {
    let correlation_id = command.correlation_id();
    let bytes = match command.image {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            debug!(%correlation_id, "upload rejected: no image");
            return Err(DomainError::MissingInput(MISSING_IMAGE_MESSAGE.to_owned()));
        }
    };

    let content_type = command.content_type.trim().to_ascii_lowercase();
    if !content_type.starts_with("image/") {
        return Err(DomainError::Validation(format!(
            "unsupported content type `{}`; expected an image",
            command.content_type
        )));
    }
    if bytes.len() > max_image_bytes {
        return Err(DomainError::Validation(format!(
            "image is {} bytes; the limit is {max_image_bytes}",
            bytes.len()
        )));
    }

    let size = bytes.len();
    let blob_ref = blob_store
        .put(ImageBlob {
            content_type,
            bytes,
            stored_at: clock.now(),
        })
        .await?;

    info!(%correlation_id, %blob_ref, size, "image stored for new story");

    Ok(Story::new(command.title.trim(), blob_ref))
}
