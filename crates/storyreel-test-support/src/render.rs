//! Test renderer that records every request the controller makes.

use std::sync::{Arc, Mutex};

use storyreel_core::render::{Progress, RenderFrame, ViewRenderer, ViewState};

/// One call received by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// `on_render` was called.
    Render(RenderFrame),
    /// `on_view_state_change` was called.
    ViewState(ViewState),
    /// `on_progress_reset` was called.
    ProgressReset(Progress),
}

/// A renderer whose clones share one event log.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<RenderEvent>>>,
}

impl RecordingRenderer {
    /// Creates a renderer with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded event.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<RenderEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Only the rendered frames, in order.
    pub fn frames(&self) -> Vec<RenderFrame> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::Render(frame) => Some(frame),
                _ => None,
            })
            .collect()
    }

    /// The most recent rendered frame.
    pub fn last_frame(&self) -> Option<RenderFrame> {
        self.frames().pop()
    }

    /// Only the view state changes, in order.
    pub fn view_states(&self) -> Vec<ViewState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RenderEvent::ViewState(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    /// Drops everything recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn record(&self, event: RenderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ViewRenderer for RecordingRenderer {
    fn on_render(&mut self, frame: &RenderFrame) {
        self.record(RenderEvent::Render(frame.clone()));
    }

    fn on_view_state_change(&mut self, state: ViewState) {
        self.record(RenderEvent::ViewState(state));
    }

    fn on_progress_reset(&mut self, progress: Progress) {
        self.record(RenderEvent::ProgressReset(progress));
    }
}
