//! Per-story countdown.
//!
//! A running countdown holds two host requests at once: a frame request that
//! keeps the progress bar moving, and a deadline that says "advance now".
//! Only the deadline is authoritative. The frame loop is presentation only
//! and stops by itself once a frame sees the full duration elapsed.
//!
//! The timer does not call back into its owner. The owner forwards each
//! [`Wakeup`](storyreel_core::scheduler::Wakeup) it receives to
//! [`PlaybackTimer::on_frame`] or [`PlaybackTimer::on_deadline`] and acts on
//! the returned value.

use std::time::Duration;

use chrono::{DateTime, Utc};
use storyreel_core::clock::elapsed_between;
use storyreel_core::scheduler::{DeadlineHandle, FrameHandle, Scheduler};
use tracing::trace;

#[derive(Debug, Clone, Copy)]
struct Countdown {
    started_at: DateTime<Utc>,
    duration: Duration,
    /// Last elapsed value reported; never decreases.
    elapsed: Duration,
    /// Pending frame request, `None` once the frame loop has finished.
    frame: Option<FrameHandle>,
    deadline: DeadlineHandle,
}

/// A cancellable fixed-duration countdown.
///
/// At most one countdown exists per timer. Starting again cancels the
/// previous one first, and cancelling removes both host requests before
/// returning, so nothing from a superseded countdown can ever fire.
#[derive(Debug, Default)]
pub struct PlaybackTimer {
    countdown: Option<Countdown>,
}

impl PlaybackTimer {
    /// Creates an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a countdown of `duration` from `now`, cancelling any countdown
    /// already running.
    pub fn start<S>(&mut self, duration: Duration, now: DateTime<Utc>, scheduler: &mut S)
    where
        S: Scheduler + ?Sized,
    {
        self.cancel(scheduler);
        let frame = scheduler.request_frame();
        let deadline = scheduler.schedule_deadline(duration);
        trace!(?frame, ?deadline, duration_ms = duration.as_millis(), "countdown started");
        self.countdown = Some(Countdown {
            started_at: now,
            duration,
            elapsed: Duration::ZERO,
            frame: Some(frame),
            deadline,
        });
    }

    /// Stops the running countdown, if any. Returns whether one was running.
    pub fn cancel<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: Scheduler + ?Sized,
    {
        let Some(countdown) = self.countdown.take() else {
            return false;
        };
        if let Some(frame) = countdown.frame {
            scheduler.cancel_frame(frame);
        }
        scheduler.cancel_deadline(countdown.deadline);
        trace!(elapsed_ms = countdown.elapsed.as_millis(), "countdown cancelled");
        true
    }

    /// Whether a countdown is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.countdown.is_some()
    }

    /// Elapsed time last reported by the running countdown.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.countdown.map(|countdown| countdown.elapsed)
    }

    /// When the running countdown started.
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.countdown.map(|countdown| countdown.started_at)
    }

    /// Handles a delivered frame. Returns the elapsed time to display,
    /// clamped to the duration, and requests the next frame unless the
    /// duration has been reached.
    ///
    /// Returns `None` when no frame was pending.
    pub fn on_frame<S>(&mut self, now: DateTime<Utc>, scheduler: &mut S) -> Option<Duration>
    where
        S: Scheduler + ?Sized,
    {
        let countdown = self.countdown.as_mut()?;
        countdown.frame.take()?;

        let elapsed = elapsed_between(countdown.started_at, now)
            .min(countdown.duration)
            .max(countdown.elapsed);
        countdown.elapsed = elapsed;

        if elapsed < countdown.duration {
            countdown.frame = Some(scheduler.request_frame());
        }
        Some(elapsed)
    }

    /// Handles the delivered deadline. Returns a [`Completion`] exactly once
    /// per countdown; the countdown is finished afterwards and any pending
    /// frame is cancelled.
    pub fn on_deadline<S>(&mut self, scheduler: &mut S) -> Option<Completion>
    where
        S: Scheduler + ?Sized,
    {
        let countdown = self.countdown.take()?;
        if let Some(frame) = countdown.frame {
            scheduler.cancel_frame(frame);
        }
        let final_tick = (countdown.elapsed < countdown.duration).then_some(countdown.duration);
        trace!(final_tick = final_tick.is_some(), "countdown completed");
        Some(Completion { final_tick })
    }
}

/// A countdown that reached its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Elapsed time to display before moving on, equal to the full duration.
    /// `None` when a frame already reported the full duration.
    pub final_tick: Option<Duration>,
}
