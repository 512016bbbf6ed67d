//! Outbound ports (driven side - SPI)

use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// Port: Wall clock used for block timestamps
pub trait TimeSource: Send + Sync + fmt::Debug {
    /// Current time; the ledger drops any sub-second part before sealing
    fn now(&self) -> DateTime<Utc>;
}

/// System clock adapter
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// Deterministic clock that advances by a fixed step on every read
///
/// A zero step gives a frozen clock.
#[derive(Debug)]
pub struct SteppingTimeSource {
    next: AtomicI64,
    step_secs: i64,
}

impl SteppingTimeSource {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: AtomicI64::new(start.timestamp()),
            step_secs: step.num_seconds(),
        }
    }

    /// A clock that always returns `at`
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::new(at, Duration::zero())
    }
}

impl TimeSource for SteppingTimeSource {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.next.fetch_add(self.step_secs, Ordering::Relaxed);
        DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }
}
