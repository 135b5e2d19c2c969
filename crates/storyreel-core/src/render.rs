//! Renderer boundary.
//!
//! Painting is someone else's job. The controller describes what should be
//! on screen through these types and a host-provided [`ViewRenderer`].

use std::time::Duration;

use serde::Serialize;

use crate::blob::BlobRef;

/// Countdown progress for the active story.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// Elapsed fraction of the story duration, in `[0, 1]`.
    pub ratio: f64,
    /// Time left before auto-advance, in `[0, duration]`.
    #[serde(rename = "remaining_ms", with = "millis")]
    pub remaining: Duration,
}

impl Progress {
    /// Progress after `elapsed` of `duration`, clamped to the duration.
    #[must_use]
    pub fn at(elapsed: Duration, duration: Duration) -> Self {
        if duration.is_zero() {
            return Self {
                ratio: 1.0,
                remaining: Duration::ZERO,
            };
        }
        let clamped = elapsed.min(duration);
        Self {
            ratio: clamped.as_secs_f64() / duration.as_secs_f64(),
            remaining: duration - clamped,
        }
    }

    /// Progress with nothing elapsed: empty bar, full duration remaining.
    #[must_use]
    pub fn reset(duration: Duration) -> Self {
        Self::at(Duration::ZERO, duration)
    }

    /// Remaining time as seconds with one decimal, e.g. `"2.5s"`.
    #[must_use]
    pub fn remaining_label(&self) -> String {
        format!("{:.1}s", self.remaining.as_secs_f64())
    }
}

/// Everything needed to paint the active story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Position of the story in the sequence.
    pub index: usize,
    /// Title, or the `"Story N"` fallback when the title is blank.
    pub label: String,
    /// The story image.
    pub image: BlobRef,
    /// Countdown progress.
    pub progress: Progress,
}

/// Visibility derived from the playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewState {
    /// Whether a playback session is open.
    pub is_open: bool,
    /// Whether the full-screen story overlay should be shown.
    pub is_overlay_visible: bool,
}

impl ViewState {
    /// View state for an open session.
    #[must_use]
    pub fn open() -> Self {
        Self {
            is_open: true,
            is_overlay_visible: true,
        }
    }

    /// View state for a closed session.
    #[must_use]
    pub fn closed() -> Self {
        Self {
            is_open: false,
            is_overlay_visible: false,
        }
    }
}

/// Consumer of controller output.
pub trait ViewRenderer {
    /// Paint the given story and progress.
    fn on_render(&mut self, frame: &RenderFrame);

    /// The session opened or closed.
    fn on_view_state_change(&mut self, state: ViewState);

    /// Reset the progress display without a story, used on close so a later
    /// reopen starts from a full countdown.
    fn on_progress_reset(&mut self, progress: Progress);
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }
}
