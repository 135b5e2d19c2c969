//! Mock `BlobStore` implementations for tests.

use std::sync::Arc;

use async_trait::async_trait;
use storyreel_core::blob::{BlobRef, BlobStore, ImageBlob};
use storyreel_core::error::DomainError;

/// A blob store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingBlobStore;

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(&self, _blob: ImageBlob) -> Result<BlobRef, DomainError> {
        Err(DomainError::Infrastructure("blob storage unavailable".into()))
    }

    async fn get(&self, _blob_ref: BlobRef) -> Result<Arc<ImageBlob>, DomainError> {
        Err(DomainError::Infrastructure("blob storage unavailable".into()))
    }
}
