use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Everything that measures time in the workspace (crawl deadlines, profiled call durations)
/// reads it through this trait so tests can substitute a [`FakeClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Every call to [`Clock::now`] returns the current reading and then advances it by the
/// configured step (zero by default), so a profiled call observes exactly one step.
#[derive(Debug)]
pub struct FakeClock {
    nanos: AtomicI64,
    step: i64,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::with_step(start, Duration::ZERO)
    }

    pub fn with_step(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            nanos: AtomicI64::new(to_nanos(start)),
            step: i64::try_from(step.as_nanos()).unwrap_or(i64::MAX),
        }
    }

    pub fn set(&self, time: DateTime<Utc>) {
        self.nanos.store(to_nanos(time), Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let by = i64::try_from(by.as_nanos()).unwrap_or(i64::MAX);
        self.nanos.fetch_add(by, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(DateTime::UNIX_EPOCH)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.nanos.fetch_add(self.step, Ordering::SeqCst))
    }
}

fn to_nanos(time: DateTime<Utc>) -> i64 {
    time.timestamp_nanos_opt().unwrap_or(i64::MAX)
}
