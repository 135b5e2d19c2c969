//! Blob storage abstraction for uploaded images.
//!
//! The playback engine never looks inside an image: a story carries an
//! opaque [`BlobRef`] and the host resolves it when painting.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque reference to a stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(Uuid);

impl BlobRef {
    /// Creates a fresh, unique reference.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying identifier.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BlobRef {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BlobRef {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An uploaded image as held by a [`BlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    /// MIME type reported at upload time.
    pub content_type: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// When the blob was stored.
    pub stored_at: DateTime<Utc>,
}

/// Storage for uploaded image bytes, keyed by [`BlobRef`].
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores a blob and returns its reference.
    async fn put(&self, blob: ImageBlob) -> Result<BlobRef, DomainError>;

    /// Loads a blob by reference.
    ///
    /// Returns `DomainError::BlobNotFound` when nothing is stored under
    /// `blob_ref`.
    async fn get(&self, blob_ref: BlobRef) -> Result<Arc<ImageBlob>, DomainError>;
}
