//! Renderer that publishes the view as a pollable snapshot.
//!
//! The HTTP host has no screen. Each render request the controller makes is
//! folded into a [`PlaybackSnapshot`] held in a `tokio::sync::watch` channel,
//! and clients read the latest value.

use serde::Serialize;
use storyreel_core::blob::BlobRef;
use storyreel_core::render::{Progress, RenderFrame, ViewRenderer, ViewState};
use tokio::sync::watch;

/// What a client would see on screen right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    /// Whether a playback session is open.
    pub is_open: bool,
    /// Whether the full-screen overlay is visible.
    pub is_overlay_visible: bool,
    /// Active story index.
    pub index: Option<usize>,
    /// Active story label.
    pub label: Option<String>,
    /// Active story image.
    pub image: Option<BlobRef>,
    /// Elapsed fraction of the story duration.
    pub progress_ratio: f64,
    /// Time left before auto-advance, in milliseconds.
    pub remaining_ms: u64,
    /// Time left, formatted like `"2.5s"`.
    pub remaining_label: String,
}

impl PlaybackSnapshot {
    /// The closed view with progress reset for a story of `progress`'s length.
    #[must_use]
    pub fn closed(progress: Progress) -> Self {
        let mut snapshot = Self {
            is_open: false,
            is_overlay_visible: false,
            index: None,
            label: None,
            image: None,
            progress_ratio: 0.0,
            remaining_ms: 0,
            remaining_label: String::new(),
        };
        snapshot.apply_progress(progress);
        snapshot
    }

    fn apply_progress(&mut self, progress: Progress) {
        self.progress_ratio = progress.ratio;
        self.remaining_ms = u64::try_from(progress.remaining.as_millis()).unwrap_or(u64::MAX);
        self.remaining_label = progress.remaining_label();
    }
}

/// A [`ViewRenderer`] backed by a watch channel.
#[derive(Debug)]
pub struct WatchRenderer {
    sender: watch::Sender<PlaybackSnapshot>,
}

impl WatchRenderer {
    /// Creates a renderer and a receiver for its snapshots.
    #[must_use]
    pub fn new(initial: PlaybackSnapshot) -> (Self, watch::Receiver<PlaybackSnapshot>) {
        let (sender, receiver) = watch::channel(initial);
        (Self { sender }, receiver)
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.sender.borrow().clone()
    }
}

impl ViewRenderer for WatchRenderer {
    fn on_render(&mut self, frame: &RenderFrame) {
        self.sender.send_modify(|snapshot| {
            snapshot.index = Some(frame.index);
            snapshot.label = Some(frame.label.clone());
            snapshot.image = Some(frame.image);
            snapshot.apply_progress(frame.progress);
        });
    }

    fn on_view_state_change(&mut self, view: ViewState) {
        self.sender.send_modify(|snapshot| {
            snapshot.is_open = view.is_open;
            snapshot.is_overlay_visible = view.is_overlay_visible;
            if !view.is_open {
                snapshot.index = None;
                snapshot.label = None;
                snapshot.image = None;
            }
        });
    }

    fn on_progress_reset(&mut self, progress: Progress) {
        self.sender
            .send_modify(|snapshot| snapshot.apply_progress(progress));
    }
}
