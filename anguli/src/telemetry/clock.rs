//! Wall-clock sources.

use parking_lot::Mutex;
use std::time::{Duration, SystemTime};

/// Source of wall-clock timestamps for run telemetry.
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> SystemTime;
}

/// The operating system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    /// Clock stopped at `start`.
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Clock stopped at the Unix epoch.
    pub fn at_epoch() -> Self {
        Self::new(SystemTime::UNIX_EPOCH)
    }

    /// Jump to an absolute time (may go backwards).
    pub fn set(&self, time: SystemTime) {
        *self.now.lock() = time;
    }

    /// Move forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    /// Move backward; saturates at the epoch.
    pub fn rewind(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = now.checked_sub(by).unwrap_or(SystemTime::UNIX_EPOCH);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at_epoch()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock()
    }
}
