//! Clock abstraction for determinism.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Abstraction over wall time, injected wherever a timestamp is taken so
/// tests can step time by hand.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Time elapsed since `start`, saturating at zero when `start` lies in
    /// the future.
    fn elapsed_since(&self, start: DateTime<Utc>) -> Duration {
        elapsed_between(start, self.now())
    }
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Non-negative span between two timestamps.
#[must_use]
pub fn elapsed_between(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    (end - start).to_std().unwrap_or(Duration::ZERO)
}
