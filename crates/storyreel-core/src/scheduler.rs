//! Host scheduling abstraction.
//!
//! The playback timer needs two things from its host: a paint-driven frame
//! callback for smooth progress, and a one-shot deferred deadline for the
//! authoritative "advance now" signal. Both are requested through
//! [`Scheduler`]; the host later hands the owner a [`Wakeup`] naming which
//! one fired. Hosts that poll for due work also implement [`DueWakeups`].
//!
//! # Host contract
//!
//! A cancelled handle is never delivered. Once `cancel_frame` or
//! `cancel_deadline` returns, the host has forgotten the request entirely, so
//! a superseded timer has nothing left that could fire.

use std::fmt;
use std::time::Duration;

/// Handle to a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Handle to a pending deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeadlineHandle(pub u64);

/// A scheduled request that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// The host is about to paint.
    Frame(FrameHandle),
    /// A deferred deadline elapsed.
    Deadline(DeadlineHandle),
}

impl fmt::Display for Wakeup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame(FrameHandle(id)) => write!(f, "frame#{id}"),
            Self::Deadline(DeadlineHandle(id)) => write!(f, "deadline#{id}"),
        }
    }
}

/// Frame and deadline scheduling provided by the host environment.
pub trait Scheduler {
    /// Requests a single callback at the host's next paint.
    fn request_frame(&mut self) -> FrameHandle;

    /// Forgets a pending frame request. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Requests a single callback once `after` has elapsed.
    fn schedule_deadline(&mut self, after: Duration) -> DeadlineHandle;

    /// Forgets a pending deadline. Unknown handles are ignored.
    fn cancel_deadline(&mut self, handle: DeadlineHandle);
}

/// A scheduler whose host polls it for wakeups that have come due.
///
/// Owners hand due wakeups straight to their state machine, so this exposes
/// nothing beyond taking them off the queue.
pub trait DueWakeups: Scheduler {
    /// The host's notion of a point in time.
    type Instant: Copy;

    /// Removes and returns the earliest wakeup due at or before `now`. At
    /// equal instants frames come before deadlines.
    fn pop_due(&mut self, now: Self::Instant) -> Option<Wakeup>;
}
