//! Playback configuration.

use std::time::Duration;

use storyreel_core::error::DomainError;

/// How long each story stays on screen before auto-advancing.
pub const STORY_DURATION: Duration = Duration::from_millis(3000);

/// Settings shared by every story in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    story_duration: Duration,
}

impl PlaybackConfig {
    /// Creates a configuration with a custom story duration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `story_duration` is zero.
    pub fn new(story_duration: Duration) -> Result<Self, DomainError> {
        if story_duration.is_zero() {
            return Err(DomainError::Validation(
                "story duration must be greater than zero".into(),
            ));
        }
        Ok(Self { story_duration })
    }

    /// The per-story countdown length.
    #[must_use]
    pub fn story_duration(&self) -> Duration {
        self.story_duration
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            story_duration: STORY_DURATION,
        }
    }
}
