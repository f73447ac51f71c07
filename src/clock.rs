//! Wall-clock abstraction.
//!
//! Retry delays are computed against "now", which is injected so callers and tests can pin it.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Reads the system clock on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub SystemTime);

impl FixedClock {
    /// # Panics
    ///
    /// Panics if `secs` is past what `SystemTime` can hold; see [`FixedClock::try_from_unix_secs`].
    pub fn from_unix_secs(secs: u64) -> Self {
        FixedClock(UNIX_EPOCH + Duration::from_secs(secs))
    }

    pub fn try_from_unix_secs(secs: u64) -> Option<Self> {
        UNIX_EPOCH
            .checked_add(Duration::from_secs(secs))
            .map(FixedClock)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}
