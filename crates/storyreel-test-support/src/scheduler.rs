//! A virtual-time `Scheduler` driven by `ManualHost`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use storyreel_core::clock::Clock;
use storyreel_core::scheduler::{DeadlineHandle, DueWakeups, FrameHandle, Scheduler, Wakeup};

use crate::clock::ManualClock;

/// Frame cadence used unless a test picks its own (50 frames per second).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug)]
struct Pending {
    due: DateTime<Utc>,
    seq: u64,
    wakeup: Wakeup,
}

impl Pending {
    /// Frames paint before deadlines that come due at the same instant.
    fn sort_key(&self) -> (DateTime<Utc>, u8, u64) {
        let rank = match self.wakeup {
            Wakeup::Frame(_) => 0,
            Wakeup::Deadline(_) => 1,
        };
        (self.due, rank, self.seq)
    }
}

#[derive(Debug)]
struct Queue {
    next_id: u64,
    pending: Vec<Pending>,
    frames_requested: usize,
    deadlines_scheduled: usize,
}

/// A scheduler that records requests against a [`ManualClock`] and releases
/// them only when a [`ManualHost`](crate::ManualHost) advances time.
///
/// Clones share the same queue, so a test can keep one clone for inspection
/// while the code under test owns another. Cancelling removes the request from
/// the queue outright, which is exactly the host contract the playback engine
/// relies on.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    clock: ManualClock,
    frame_interval: Duration,
    queue: Arc<Mutex<Queue>>,
}

impl ManualScheduler {
    /// Creates a scheduler painting every [`DEFAULT_FRAME_INTERVAL`].
    #[must_use]
    pub fn new(clock: ManualClock) -> Self {
        Self::with_frame_interval(clock, DEFAULT_FRAME_INTERVAL)
    }

    /// Creates a scheduler painting every `frame_interval`.
    ///
    /// # Panics
    ///
    /// Panics if `frame_interval` is zero; virtual time would never move.
    #[must_use]
    pub fn with_frame_interval(clock: ManualClock, frame_interval: Duration) -> Self {
        assert!(!frame_interval.is_zero(), "frame interval must be non-zero");
        Self {
            clock,
            frame_interval,
            queue: Arc::new(Mutex::new(Queue {
                next_id: 0,
                pending: Vec::new(),
                frames_requested: 0,
                deadlines_scheduled: 0,
            })),
        }
    }

    /// Requests still waiting to fire, earliest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn pending(&self) -> Vec<Wakeup> {
        let queue = self.queue.lock().unwrap();
        let mut pending: Vec<&Pending> = queue.pending.iter().collect();
        pending.sort_by_key(|p| p.sort_key());
        pending.into_iter().map(|p| p.wakeup).collect()
    }

    /// Number of pending frame requests.
    pub fn pending_frames(&self) -> usize {
        self.pending()
            .iter()
            .filter(|w| matches!(w, Wakeup::Frame(_)))
            .count()
    }

    /// Number of pending deadlines.
    pub fn pending_deadlines(&self) -> usize {
        self.pending()
            .iter()
            .filter(|w| matches!(w, Wakeup::Deadline(_)))
            .count()
    }

    /// Total frame requests ever made.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn frames_requested(&self) -> usize {
        self.queue.lock().unwrap().frames_requested
    }

    /// Total deadlines ever scheduled.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn deadlines_scheduled(&self) -> usize {
        self.queue.lock().unwrap().deadlines_scheduled
    }

    /// Removes and returns the earliest request due at or before `until`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub(crate) fn take_due(&self, until: DateTime<Utc>) -> Option<(DateTime<Utc>, Wakeup)> {
        let mut queue = self.queue.lock().unwrap();
        let position = queue
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| p.sort_key())
            .map(|(position, _)| position)?;
        let next = queue.pending.swap_remove(position);
        Some((next.due, next.wakeup))
    }

    fn push(&self, after: Duration, make: impl FnOnce(u64) -> Wakeup) -> u64 {
        let due = self.clock.now() + chrono::Duration::from_std(after).unwrap();
        let mut queue = self.queue.lock().unwrap();
        let id = queue.next_id;
        queue.next_id += 1;
        let wakeup = make(id);
        match wakeup {
            Wakeup::Frame(_) => queue.frames_requested += 1,
            Wakeup::Deadline(_) => queue.deadlines_scheduled += 1,
        }
        queue.pending.push(Pending {
            due,
            seq: id,
            wakeup,
        });
        id
    }

    fn remove(&self, wakeup: Wakeup) {
        self.queue
            .lock()
            .unwrap()
            .pending
            .retain(|p| p.wakeup != wakeup);
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        FrameHandle(self.push(self.frame_interval, |id| Wakeup::Frame(FrameHandle(id))))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.remove(Wakeup::Frame(handle));
    }

    fn schedule_deadline(&mut self, after: Duration) -> DeadlineHandle {
        DeadlineHandle(self.push(after, |id| Wakeup::Deadline(DeadlineHandle(id))))
    }

    fn cancel_deadline(&mut self, handle: DeadlineHandle) {
        self.remove(Wakeup::Deadline(handle));
    }
}

impl DueWakeups for ManualScheduler {
    type Instant = DateTime<Utc>;

    /// Pops without moving the clock; [`ManualHost`](crate::ManualHost) is
    /// what steps virtual time to each due instant.
    fn pop_due(&mut self, now: DateTime<Utc>) -> Option<Wakeup> {
        self.take_due(now).map(|(_, wakeup)| wakeup)
    }
}
