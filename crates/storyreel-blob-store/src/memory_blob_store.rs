//! In-memory implementation of the `BlobStore` trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use storyreel_core::blob::{BlobRef, BlobStore, ImageBlob};
use storyreel_core::error::DomainError;

/// Process-local blob store backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    blobs: Arc<RwLock<HashMap<BlobRef, Arc<ImageBlob>>>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Returns `true` when nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, blob: ImageBlob) -> Result<BlobRef, DomainError> {
        let blob_ref = BlobRef::new();
        debug!(%blob_ref, bytes = blob.bytes.len(), content_type = %blob.content_type, "storing blob");
        self.blobs.write().await.insert(blob_ref, Arc::new(blob));
        Ok(blob_ref)
    }

    async fn get(&self, blob_ref: BlobRef) -> Result<Arc<ImageBlob>, DomainError> {
        self.blobs
            .read()
            .await
            .get(&blob_ref)
            .cloned()
            .ok_or(DomainError::BlobNotFound(blob_ref))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn sample_blob() -> ImageBlob {
        ImageBlob {
            content_type: "image/png".to_owned(),
            bytes: vec![0x89, b'P', b'N', b'G'],
            stored_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get_returns_same_blob() {
        // Arrange
        let store = InMemoryBlobStore::new();
        let blob = sample_blob();

        // Act
        let blob_ref = store.put(blob.clone()).await.unwrap();
        let loaded = store.get(blob_ref).await.unwrap();

        // Assert
        assert_eq!(*loaded, blob);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_put_issues_distinct_refs() {
        let store = InMemoryBlobStore::new();

        let first = store.put(sample_blob()).await.unwrap();
        let second = store.put(sample_blob()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_get_unknown_ref_returns_blob_not_found() {
        // Arrange
        let store = InMemoryBlobStore::new();
        let missing = BlobRef::new();

        // Act
        let result = store.get(missing).await;

        // Assert
        match result.unwrap_err() {
            DomainError::BlobNotFound(blob_ref) => assert_eq!(blob_ref, missing),
            other => panic!("expected BlobNotFound, got {other:?}"),
        }
        assert!(store.is_empty().await);
    }
}
