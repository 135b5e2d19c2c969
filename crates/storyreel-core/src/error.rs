//! Domain error types.

use thiserror::Error;

use crate::blob::BlobRef;

/// Top-level domain error type.
///
/// Nothing here is fatal: playback failures are swallowed by the controller,
/// ingestion failures abort the upload without mutating any state.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Navigation was requested against an empty sequence or an invalid index.
    #[error("index {index} is out of range for {len} stories")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The sequence length at the time of the request.
        len: usize,
    },

    /// Playback navigation was requested while no session is open.
    #[error("no playback session is open")]
    SessionClosed,

    /// No story exists at the given position.
    #[error("story not found: {0}")]
    StoryNotFound(usize),

    /// No blob exists for the given reference.
    #[error("blob not found: {0}")]
    BlobNotFound(BlobRef),

    /// A required input was absent at submission time.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure error (storage, runtime task).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
