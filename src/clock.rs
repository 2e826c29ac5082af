//! Timestamp supply for log records.
//!
//! Records are stamped on the producer thread at `log()` time, so the
//! clock is consulted before the record enters the queue. The default
//! clock reads the system wall clock; tests swap in [`ManualClock`] to get
//! deterministic timestamps.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::Duration;

/// Supplier of record timestamps.
///
/// Implementations must be monotonically non-decreasing across calls from
/// a single thread.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests.
///
/// Starts at a fixed instant and only moves when told to.
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            current: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.current.lock();
        *guard += chrono::TimeDelta::from_std(by).unwrap_or(chrono::TimeDelta::zero());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
