//! Test host that steps virtual time and delivers due wakeups.

use std::time::Duration;

use chrono::{DateTime, Utc};
use storyreel_core::clock::Clock;
use storyreel_core::scheduler::Wakeup;

use crate::clock::ManualClock;
use crate::scheduler::ManualScheduler;

/// A manual clock and scheduler sharing one virtual timeline.
///
/// Hand `clock` and `scheduler` clones to the code under test, then call
/// [`ManualHost::advance`] to fire whatever comes due.
#[derive(Debug, Clone)]
pub struct ManualHost {
    /// The shared virtual clock.
    pub clock: ManualClock,
    /// The shared scheduler queue.
    pub scheduler: ManualScheduler,
}

impl ManualHost {
    /// Creates a host at [`epoch`](crate::epoch) with the default frame
    /// cadence.
    #[must_use]
    pub fn new() -> Self {
        let clock = ManualClock::default();
        let scheduler = ManualScheduler::new(clock.clone());
        Self { clock, scheduler }
    }

    /// Creates a host that paints every `frame_interval`.
    #[must_use]
    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        let clock = ManualClock::default();
        let scheduler = ManualScheduler::with_frame_interval(clock.clone(), frame_interval);
        Self { clock, scheduler }
    }

    /// Moves time forward by `by`, delivering each wakeup as it comes due
    /// with the clock set to its due time. Wakeups scheduled during delivery
    /// are honored if they fall inside the window. Returns how many wakeups
    /// were delivered.
    ///
    /// # Panics
    ///
    /// Panics if `by` does not fit in a chrono duration.
    pub fn advance<F>(&self, by: Duration, mut deliver: F) -> usize
    where
        F: FnMut(Wakeup, DateTime<Utc>),
    {
        let target = self.clock.now() + chrono::Duration::from_std(by).unwrap();
        let mut delivered = 0;
        while let Some((due, wakeup)) = self.scheduler.take_due(target) {
            if due > self.clock.now() {
                self.clock.set(due);
            }
            deliver(wakeup, self.clock.now());
            delivered += 1;
        }
        self.clock.set(target);
        delivered
    }
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}
