//! Playback state machine.
//!
//! The controller exclusively owns the session state, the story sequence and
//! the single countdown. Every transition into `Open` cancels the running
//! countdown before starting a fresh one; every transition into `Closed`
//! cancels it and resets the progress display.
//!
//! Navigation at the last story depends on who asked. A manual "next" wraps
//! to the first story, while the countdown expiring on the last story closes
//! the viewer instead of looping unattended.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use storyreel_core::clock::Clock;
use storyreel_core::command::{Command, CommandOutcome};
use storyreel_core::error::DomainError;
use storyreel_core::render::{Progress, RenderFrame, ViewRenderer, ViewState};
use storyreel_core::scheduler::{DueWakeups, Scheduler, Wakeup};
use storyreel_stories::domain::story::{Story, StoryStore};
use tracing::{debug, trace};

use crate::commands::{PlaybackAction, PlaybackCommand};
use crate::config::PlaybackConfig;
use crate::input::{Key, KeyAction};
use crate::timer::PlaybackTimer;

/// Whether the viewer is showing a story, and which one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// The viewer is hidden.
    Closed,
    /// The story at `index` is on screen.
    Open {
        /// Position of the active story.
        index: usize,
    },
}

impl SessionState {
    /// Whether a session is open.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// The active story index, if open.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Open { index } => Some(index),
            Self::Closed => None,
        }
    }

    /// Visibility derived from this state.
    #[must_use]
    pub fn view_state(self) -> ViewState {
        if self.is_open() {
            ViewState::open()
        } else {
            ViewState::closed()
        }
    }
}

/// Who asked for the move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Explicit user input; wraps from the last story to the first.
    Manual,
    /// The countdown expired; closes after the last story.
    Auto,
}

/// The story playback state machine.
pub struct PlaybackController<S, R> {
    config: PlaybackConfig,
    clock: Arc<dyn Clock>,
    scheduler: S,
    renderer: R,
    stories: StoryStore,
    state: SessionState,
    timer: PlaybackTimer,
}

impl<S, R> std::fmt::Debug for PlaybackController<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("config", &self.config)
            .field("stories", &self.stories.len())
            .field("state", &self.state)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl<S, R> PlaybackController<S, R>
where
    S: Scheduler,
    R: ViewRenderer,
{
    /// Creates a closed controller with an empty story sequence.
    #[must_use]
    pub fn new(config: PlaybackConfig, clock: Arc<dyn Clock>, scheduler: S, renderer: R) -> Self {
        Self {
            config,
            clock,
            scheduler,
            renderer,
            stories: StoryStore::new(),
            state: SessionState::Closed,
            timer: PlaybackTimer::new(),
        }
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The story sequence, read-only.
    #[must_use]
    pub fn stories(&self) -> &StoryStore {
        &self.stories
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> PlaybackConfig {
        self.config
    }

    /// The host scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Whether a countdown is running.
    #[must_use]
    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Progress currently on display.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let elapsed = self.timer.elapsed().unwrap_or(Duration::ZERO);
        Progress::at(elapsed, self.config.story_duration())
    }

    /// What is on screen right now, if a story is open.
    #[must_use]
    pub fn current_frame(&self) -> Option<RenderFrame> {
        let index = self.state.index()?;
        let elapsed = self.timer.elapsed().unwrap_or(Duration::ZERO);
        self.frame_for(index, elapsed).ok()
    }

    /// Appends a story. Playback state is untouched.
    pub fn append(&mut self, story: Story) -> usize {
        let index = self.stories.push(story);
        debug!(index, len = self.stories.len(), "story appended");
        index
    }

    /// Opens the viewer at `index`, or re-targets an open viewer.
    ///
    /// Ignored when `index` does not address a story.
    pub fn open_at(&mut self, index: usize) -> CommandOutcome {
        match self.stories.check_index(index) {
            Ok(index) => self.enter(index),
            Err(reason) => Self::ignore("open_at", reason),
        }
    }

    /// Manual forward: wraps from the last story to the first.
    pub fn next(&mut self) -> CommandOutcome {
        self.advance(Advance::Manual)
    }

    /// Moves forward. At the last story a manual advance wraps to the first
    /// story and an automatic one closes the viewer.
    ///
    /// Ignored while closed.
    pub fn advance(&mut self, advance: Advance) -> CommandOutcome {
        let (current, last) = match self.position() {
            Ok(position) => position,
            Err(reason) => return Self::ignore("next", reason),
        };
        if current < last {
            return self.enter(current + 1);
        }
        match advance {
            Advance::Manual => self.enter(0),
            Advance::Auto => {
                debug!(index = current, "countdown expired on last story");
                self.close()
            }
        }
    }

    /// Moves backward, wrapping from the first story to the last.
    ///
    /// Ignored while closed.
    pub fn previous(&mut self) -> CommandOutcome {
        let (current, last) = match self.position() {
            Ok(position) => position,
            Err(reason) => return Self::ignore("previous", reason),
        };
        self.enter(if current == 0 { last } else { current - 1 })
    }

    /// Closes the viewer. Calling it again is a no-op.
    pub fn close(&mut self) -> CommandOutcome {
        self.timer.cancel(&mut self.scheduler);
        let Some(index) = self.state.index() else {
            return Self::ignore("close", DomainError::SessionClosed);
        };
        self.state = SessionState::Closed;
        self.renderer
            .on_progress_reset(Progress::reset(self.config.story_duration()));
        self.renderer.on_view_state_change(self.state.view_state());
        debug!(from = index, "playback closed");
        CommandOutcome::Applied
    }

    /// Applies a key press. Keys do nothing while closed.
    pub fn handle_key(&mut self, key: Key) -> CommandOutcome {
        if !self.state.is_open() {
            return Self::ignore("key", DomainError::SessionClosed);
        }
        match key.action() {
            Some(KeyAction::Next) => self.next(),
            Some(KeyAction::Previous) => self.previous(),
            Some(KeyAction::Close) => self.close(),
            None => Self::ignore(
                "key",
                DomainError::Validation(format!("no binding for {key:?}")),
            ),
        }
    }

    /// Executes a playback command.
    pub fn execute(&mut self, command: &PlaybackCommand) -> CommandOutcome {
        let outcome = match command.action {
            PlaybackAction::OpenAt(index) => self.open_at(index),
            PlaybackAction::Next => self.next(),
            PlaybackAction::Previous => self.previous(),
            PlaybackAction::Close => self.close(),
            PlaybackAction::Key(key) => self.handle_key(key),
        };
        debug!(
            correlation_id = %command.correlation_id(),
            command_type = command.command_type(),
            %outcome,
            state = ?self.state,
            "playback command executed"
        );
        outcome
    }

    /// Routes a host wakeup to the countdown. Frames repaint progress; the
    /// deadline paints the finished bar, then advances automatically.
    pub fn on_wakeup(&mut self, wakeup: Wakeup, now: DateTime<Utc>) {
        match wakeup {
            Wakeup::Frame(_) => {
                if let Some(elapsed) = self.timer.on_frame(now, &mut self.scheduler) {
                    self.render_tick(elapsed);
                }
            }
            Wakeup::Deadline(_) => {
                let Some(completion) = self.timer.on_deadline(&mut self.scheduler) else {
                    return;
                };
                if let Some(elapsed) = completion.final_tick {
                    self.render_tick(elapsed);
                }
                self.advance(Advance::Auto);
            }
        }
    }

    fn render_tick(&mut self, elapsed: Duration) {
        let Some(index) = self.state.index() else {
            return;
        };
        if let Ok(frame) = self.frame_for(index, elapsed) {
            self.renderer.on_render(&frame);
        }
    }

    /// Shows the story at `index` with a fresh countdown. Callers have
    /// already checked the index.
    fn enter(&mut self, index: usize) -> CommandOutcome {
        let frame = match self.frame_for(index, Duration::ZERO) {
            Ok(frame) => frame,
            Err(reason) => return Self::ignore("enter", reason),
        };

        self.timer.cancel(&mut self.scheduler);
        let previous = self.state;
        self.state = SessionState::Open { index };
        if !previous.is_open() {
            self.renderer.on_view_state_change(self.state.view_state());
        }
        self.renderer.on_render(&frame);
        self.timer.start(
            self.config.story_duration(),
            self.clock.now(),
            &mut self.scheduler,
        );

        debug!(from = ?previous, to = index, label = %frame.label, "story entered");
        CommandOutcome::Applied
    }

    /// Current index and last index of an open session.
    fn position(&self) -> Result<(usize, usize), DomainError> {
        let current = self.state.index().ok_or(DomainError::SessionClosed)?;
        let last = self
            .stories
            .last_index()
            .ok_or(DomainError::OutOfRange { index: current, len: 0 })?;
        Ok((current, last))
    }

    fn frame_for(&self, index: usize, elapsed: Duration) -> Result<RenderFrame, DomainError> {
        let story = self.stories.get(index)?;
        Ok(RenderFrame {
            index,
            label: story.label(index),
            image: story.image(),
            progress: Progress::at(elapsed, self.config.story_duration()),
        })
    }

    fn ignore(operation: &'static str, reason: DomainError) -> CommandOutcome {
        debug!(operation, %reason, "playback request ignored");
        CommandOutcome::Ignored(reason)
    }
}

impl<S, R> PlaybackController<S, R>
where
    S: DueWakeups,
    R: ViewRenderer,
{
    /// Delivers every wakeup due by `due_by`, one at a time, stamped with the
    /// controller's clock. A delivery may cancel another wakeup due at the
    /// same instant, so the queue is re-read after each one. Returns how many
    /// were delivered.
    pub fn deliver_due(&mut self, due_by: S::Instant) -> usize {
        let mut delivered = 0;
        while let Some(wakeup) = self.scheduler.pop_due(due_by) {
            trace!(%wakeup, "delivering wakeup");
            let now = self.clock.now();
            self.on_wakeup(wakeup, now);
            delivered += 1;
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use storyreel_core::blob::BlobRef;
    use storyreel_core::clock::Clock;
    use storyreel_core::command::CommandOutcome;
    use storyreel_core::error::DomainError;
    use storyreel_core::render::{Progress, ViewState};
    use storyreel_stories::domain::story::Story;
    use storyreel_test_support::{ManualHost, ManualScheduler, RecordingRenderer, RenderEvent};

    use super::{Advance, PlaybackController, SessionState};
    use crate::commands::{PlaybackAction, PlaybackCommand};
    use crate::config::PlaybackConfig;
    use crate::input::Key;

    type TestController = PlaybackController<ManualScheduler, RecordingRenderer>;

    const DURATION: Duration = Duration::from_millis(3000);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn controller_with(host: &ManualHost, titles: &[&str]) -> (TestController, RecordingRenderer) {
        let renderer = RecordingRenderer::new();
        let mut controller = PlaybackController::new(
            PlaybackConfig::default(),
            Arc::new(host.clock.clone()),
            host.scheduler.clone(),
            renderer.clone(),
        );
        for title in titles {
            controller.append(Story::new(*title, BlobRef::new()));
        }
        (controller, renderer)
    }

    fn run(host: &ManualHost, controller: &mut TestController, by: Duration) {
        host.advance(by, |wakeup, now| controller.on_wakeup(wakeup, now));
    }

    fn assert_progress_reset(progress: Progress) {
        assert!(progress.ratio.abs() < f64::EPSILON, "ratio was {}", progress.ratio);
        assert_eq!(progress.remaining, DURATION);
    }

    #[test]
    fn test_open_at_renders_story_and_starts_countdown() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A"]);

        // Act
        let outcome = controller.open_at(0);

        // Assert
        assert!(outcome.is_applied());
        assert_eq!(controller.state(), SessionState::Open { index: 0 });
        assert!(controller.is_timer_running());
        assert_eq!(renderer.view_states(), vec![ViewState::open()]);
        let frame = renderer.last_frame().unwrap();
        assert_eq!(frame.label, "A");
        assert_eq!(frame.image, controller.stories().get(0).unwrap().image());
        assert_progress_reset(frame.progress);
        assert_eq!(host.scheduler.pending_deadlines(), 1);
        assert_eq!(host.scheduler.pending_frames(), 1);
    }

    #[test]
    fn test_single_story_auto_advance_closes() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A"]);
        controller.open_at(0);

        // Act
        run(&host, &mut controller, ms(3000));

        // Assert
        assert_eq!(controller.state(), SessionState::Closed);
        assert!(!controller.is_timer_running());
        assert!(host.scheduler.pending().is_empty());
        assert_eq!(
            renderer.view_states(),
            vec![ViewState::open(), ViewState::closed()]
        );
    }

    #[test]
    fn test_single_story_manual_next_wraps_to_itself() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A"]);
        controller.open_at(0);
        run(&host, &mut controller, ms(1000));
        renderer.clear();

        // Act
        let outcome = controller.next();

        // Assert
        assert!(outcome.is_applied());
        assert_eq!(controller.state(), SessionState::Open { index: 0 });
        let frames = renderer.frames();
        assert_eq!(frames.len(), 1);
        assert_progress_reset(frames[0].progress);
        assert!(renderer.view_states().is_empty());
    }

    #[test]
    fn test_manual_next_walks_forward_then_wraps() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["", "", ""]);
        controller.open_at(0);

        // Act
        controller.handle_key(Key::ArrowRight);
        controller.handle_key(Key::ArrowRight);
        let at_last = controller.state();
        let last_label = renderer.last_frame().unwrap().label;
        controller.handle_key(Key::ArrowRight);

        // Assert
        assert_eq!(at_last, SessionState::Open { index: 2 });
        assert_eq!(last_label, "Story 3");
        assert_eq!(controller.state(), SessionState::Open { index: 0 });
        assert_eq!(renderer.last_frame().unwrap().label, "Story 1");
    }

    #[test]
    fn test_auto_advance_from_last_of_two_closes() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, _renderer) = controller_with(&host, &["A", "B"]);
        controller.open_at(1);

        // Act
        run(&host, &mut controller, ms(3000));

        // Assert
        assert_eq!(controller.state(), SessionState::Closed);
        assert!(host.scheduler.pending().is_empty());
    }

    #[test]
    fn test_auto_advance_moves_through_sequence_then_closes() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A", "B", "C"]);
        controller.open_at(0);

        // Act
        run(&host, &mut controller, ms(3000));
        let after_first = controller.state();
        run(&host, &mut controller, ms(3000));
        let after_second = controller.state();
        run(&host, &mut controller, ms(3000));

        // Assert
        assert_eq!(after_first, SessionState::Open { index: 1 });
        assert_eq!(after_second, SessionState::Open { index: 2 });
        assert_eq!(controller.state(), SessionState::Closed);
        let labels: Vec<String> = renderer
            .frames()
            .into_iter()
            .filter(|frame| frame.progress.remaining == DURATION)
            .map(|frame| frame.label)
            .collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_manual_wrap_vs_auto_end_at_last_index() {
        let host = ManualHost::new();
        let (mut manual, _) = controller_with(&host, &["A", "B", "C", "D"]);
        manual.open_at(3);
        manual.advance(Advance::Manual);
        assert_eq!(manual.state(), SessionState::Open { index: 0 });

        let (mut auto, _) = controller_with(&host, &["A", "B", "C", "D"]);
        auto.open_at(3);
        auto.advance(Advance::Auto);
        assert_eq!(auto.state(), SessionState::Closed);
        assert!(!auto.is_timer_running());
    }

    #[test]
    fn test_previous_at_first_wraps_to_last() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A", "B", "C", "D", "E"]);
        controller.open_at(0);

        // Act
        controller.previous();

        // Assert
        assert_eq!(controller.state(), SessionState::Open { index: 4 });
        assert_eq!(renderer.last_frame().unwrap().label, "E");
    }

    #[test]
    fn test_previous_steps_back() {
        let host = ManualHost::new();
        let (mut controller, _) = controller_with(&host, &["A", "B", "C"]);
        controller.open_at(2);

        controller.handle_key(Key::ArrowLeft);

        assert_eq!(controller.state(), SessionState::Open { index: 1 });
    }

    #[test]
    fn test_navigation_resets_progress() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A", "B", "C"]);
        controller.open_at(1);
        run(&host, &mut controller, ms(2000));
        assert!(renderer.last_frame().unwrap().progress.ratio > 0.6);

        // Act
        controller.previous();
        let after_previous = renderer.last_frame().unwrap();
        run(&host, &mut controller, ms(1500));
        controller.next();
        let after_next = renderer.last_frame().unwrap();

        // Assert
        assert_eq!(after_previous.index, 0);
        assert_progress_reset(after_previous.progress);
        assert_eq!(after_next.index, 1);
        assert_progress_reset(after_next.progress);
        assert_progress_reset(controller.progress());
    }

    #[test]
    fn test_restarted_countdown_completes_once_with_non_increasing_remaining() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A", "B", "C"]);
        controller.open_at(0);
        run(&host, &mut controller, ms(1200));

        // Act
        controller.next();
        renderer.clear();
        run(&host, &mut controller, ms(3000));

        // Assert
        assert_eq!(host.scheduler.deadlines_scheduled(), 3);
        assert_eq!(controller.state(), SessionState::Open { index: 2 });
        let remaining: Vec<Duration> = renderer
            .frames()
            .into_iter()
            .filter(|frame| frame.index == 1)
            .map(|frame| frame.progress.remaining)
            .collect();
        assert!(remaining.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(remaining.last().copied(), Some(Duration::ZERO));
        let entered: Vec<usize> = renderer
            .frames()
            .into_iter()
            .filter(|frame| frame.progress.remaining == DURATION)
            .map(|frame| frame.index)
            .collect();
        assert_eq!(entered, vec![2]);
    }

    #[test]
    fn test_countdown_reports_zero_remaining_when_frames_miss_the_deadline() {
        // Arrange: 16ms frames land at 2992ms, short of the 3000ms deadline.
        let host = ManualHost::with_frame_interval(ms(16));
        let (mut controller, renderer) = controller_with(&host, &["A", "B"]);
        controller.open_at(0);

        // Act
        run(&host, &mut controller, ms(3000));

        // Assert
        assert_eq!(controller.state(), SessionState::Open { index: 1 });
        let remaining: Vec<Duration> = renderer
            .frames()
            .into_iter()
            .filter(|frame| frame.index == 0)
            .map(|frame| frame.progress.remaining)
            .collect();
        assert!(remaining.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(remaining[remaining.len() - 2], ms(8));
        assert_eq!(remaining.last().copied(), Some(Duration::ZERO));
        assert_eq!(renderer.last_frame().unwrap().index, 1);
    }

    #[test]
    fn test_deliver_due_catches_up_a_stalled_host() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A"]);
        controller.open_at(0);
        host.clock.advance(ms(3000));

        // Act
        let delivered = controller.deliver_due(host.clock.now());
        let again = controller.deliver_due(host.clock.now());

        // Assert: one late frame showing the full bar, then the deadline.
        assert_eq!(delivered, 2);
        assert_eq!(again, 0);
        assert_eq!(controller.state(), SessionState::Closed);
        assert!(host.scheduler.pending().is_empty());
        let last_remaining = renderer.frames().last().map(|frame| frame.progress.remaining);
        assert_eq!(last_remaining, Some(Duration::ZERO));
        assert_eq!(
            renderer.view_states(),
            vec![ViewState::open(), ViewState::closed()]
        );
    }

    #[test]
    fn test_close_mid_countdown_then_reopen_starts_clean() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A", "B"]);
        controller.open_at(0);
        run(&host, &mut controller, ms(1500));

        // Act
        let outcome = controller.close();
        run(&host, &mut controller, ms(5000));
        let state_after_wait = controller.state();
        controller.open_at(0);

        // Assert
        assert!(outcome.is_applied());
        assert_eq!(state_after_wait, SessionState::Closed);
        assert!(renderer.events().iter().any(|event| matches!(
            event,
            RenderEvent::ProgressReset(progress) if progress.remaining == DURATION
        )));
        let reopened = renderer.last_frame().unwrap();
        assert_eq!(reopened.index, 0);
        assert_progress_reset(reopened.progress);
        assert_eq!(controller.state(), SessionState::Open { index: 0 });
    }

    #[test]
    fn test_close_twice_is_noop_without_duplicate_callbacks() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A"]);
        controller.open_at(0);

        // Act
        let first = controller.close();
        let events_after_first = renderer.events().len();
        let second = controller.close();
        run(&host, &mut controller, ms(10_000));

        // Assert
        assert!(first.is_applied());
        assert!(matches!(
            second,
            CommandOutcome::Ignored(DomainError::SessionClosed)
        ));
        assert_eq!(renderer.events().len(), events_after_first);
        assert!(host.scheduler.pending().is_empty());
    }

    #[test]
    fn test_escape_closes() {
        let host = ManualHost::new();
        let (mut controller, _) = controller_with(&host, &["A", "B"]);
        controller.open_at(1);

        controller.handle_key(Key::Escape);

        assert_eq!(controller.state(), SessionState::Closed);
    }

    #[test]
    fn test_empty_sequence_guards() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &[]);

        // Act
        let next = controller.next();
        let previous = controller.previous();
        let open = controller.open_at(0);

        // Assert
        assert!(!next.is_applied());
        assert!(!previous.is_applied());
        assert!(matches!(
            open,
            CommandOutcome::Ignored(DomainError::OutOfRange { index: 0, len: 0 })
        ));
        assert_eq!(controller.state(), SessionState::Closed);
        assert!(renderer.events().is_empty());
        assert_eq!(host.scheduler.deadlines_scheduled(), 0);
    }

    #[test]
    fn test_open_at_out_of_range_is_ignored() {
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A", "B"]);

        let outcome = controller.open_at(2);

        assert!(matches!(
            outcome,
            CommandOutcome::Ignored(DomainError::OutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(controller.state(), SessionState::Closed);
        assert!(renderer.events().is_empty());
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A", "B"]);

        for key in [Key::ArrowRight, Key::ArrowLeft, Key::Escape] {
            assert!(!controller.handle_key(key).is_applied());
        }

        assert_eq!(controller.state(), SessionState::Closed);
        assert!(renderer.events().is_empty());
    }

    #[test]
    fn test_unbound_key_is_ignored_while_open() {
        let host = ManualHost::new();
        let (mut controller, _) = controller_with(&host, &["A", "B"]);
        controller.open_at(0);

        let outcome = controller.handle_key(Key::Other);

        assert!(!outcome.is_applied());
        assert_eq!(controller.state(), SessionState::Open { index: 0 });
    }

    #[test]
    fn test_append_while_open_does_not_disturb_playback() {
        // Arrange
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A"]);
        controller.open_at(0);
        run(&host, &mut controller, ms(1000));
        let events_before = renderer.events().len();

        // Act
        let index = controller.append(Story::new("B", BlobRef::new()));
        run(&host, &mut controller, ms(2000));

        // Assert: the appended story makes index 0 no longer last.
        assert_eq!(index, 1);
        assert!(renderer.events().len() > events_before);
        assert_eq!(controller.state(), SessionState::Open { index: 1 });
    }

    #[test]
    fn test_append_while_closed_has_no_playback_effect() {
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &[]);

        controller.append(Story::new("A", BlobRef::new()));

        assert_eq!(controller.state(), SessionState::Closed);
        assert!(renderer.events().is_empty());
        assert!(host.scheduler.pending().is_empty());
    }

    #[test]
    fn test_open_at_while_open_retargets_with_single_countdown() {
        let host = ManualHost::new();
        let (mut controller, renderer) = controller_with(&host, &["A", "B", "C"]);
        controller.open_at(0);
        run(&host, &mut controller, ms(500));

        controller.open_at(2);

        assert_eq!(controller.state(), SessionState::Open { index: 2 });
        assert_eq!(host.scheduler.pending_deadlines(), 1);
        assert_eq!(host.scheduler.pending_frames(), 1);
        assert_eq!(renderer.view_states(), vec![ViewState::open()]);
    }

    #[test]
    fn test_execute_dispatches_actions() {
        let host = ManualHost::new();
        let (mut controller, _) = controller_with(&host, &["A", "B"]);

        controller.execute(&PlaybackCommand::new(PlaybackAction::OpenAt(1)));
        controller.execute(&PlaybackCommand::new(PlaybackAction::Next));
        let after_next = controller.state();
        controller.execute(&PlaybackCommand::new(PlaybackAction::Key(Key::ArrowLeft)));
        let after_left = controller.state();
        controller.execute(&PlaybackCommand::new(PlaybackAction::Close));

        assert_eq!(after_next, SessionState::Open { index: 0 });
        assert_eq!(after_left, SessionState::Open { index: 1 });
        assert_eq!(controller.state(), SessionState::Closed);
    }

    #[test]
    fn test_current_frame_tracks_countdown() {
        let host = ManualHost::new();
        let (mut controller, _) = controller_with(&host, &["A"]);
        assert!(controller.current_frame().is_none());

        controller.open_at(0);
        run(&host, &mut controller, ms(1500));

        let frame = controller.current_frame().unwrap();
        assert_eq!(frame.label, "A");
        assert_eq!(frame.progress.remaining, ms(1500));
        assert_eq!(frame.progress.remaining_label(), "1.5s");
    }
}
