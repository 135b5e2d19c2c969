//! Commands for the playback engine.

use storyreel_core::command::Command;
use uuid::Uuid;

use crate::input::Key;

/// A user request against the playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    /// Open the viewer at a story (thumbnail click).
    OpenAt(usize),
    /// Manual forward.
    Next,
    /// Backward.
    Previous,
    /// Close the viewer.
    Close,
    /// A key press while the viewer has focus.
    Key(Key),
}

/// Command envelope carrying a [`PlaybackAction`].
#[derive(Debug, Clone, Copy)]
pub struct PlaybackCommand {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// What the user asked for.
    pub action: PlaybackAction,
}

impl PlaybackCommand {
    /// Wraps `action` with a fresh correlation ID.
    #[must_use]
    pub fn new(action: PlaybackAction) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            action,
        }
    }
}

impl Command for PlaybackCommand {
    fn command_type(&self) -> &'static str {
        match self.action {
            PlaybackAction::OpenAt(_) => "playback.open_at",
            PlaybackAction::Next => "playback.next",
            PlaybackAction::Previous => "playback.previous",
            PlaybackAction::Close => "playback.close",
            PlaybackAction::Key(_) => "playback.key",
        }
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
