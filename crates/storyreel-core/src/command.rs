//! Command abstractions.

use std::fmt;

use uuid::Uuid;

use crate::error::DomainError;

/// Trait that all commands implement.
pub trait Command: Send + Sync + fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;
}

/// What a tolerant command did.
///
/// Playback commands never raise: a request whose precondition does not hold
/// is ignored, and the reason is kept only for logging.
#[derive(Debug)]
pub enum CommandOutcome {
    /// The command changed state.
    Applied,
    /// The command was a no-op.
    Ignored(DomainError),
}

impl CommandOutcome {
    /// Returns `true` when the command changed state.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => f.write_str("applied"),
            Self::Ignored(reason) => write!(f, "ignored ({reason})"),
        }
    }
}
