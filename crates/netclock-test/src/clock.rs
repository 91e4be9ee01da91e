//! Manually driven local clock

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use netclock_core::EpochMillis;
use netclock_time::Clock;

/// A clock that only moves when told to
///
/// Pair it with tokio's paused time: advance this clock, then let the
/// runtime fire the refresh timer.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(start: EpochMillis) -> Self {
        ManualClock {
            now: AtomicI64::new(start.as_millis()),
        }
    }

    pub fn set(&self, to: EpochMillis) {
        self.now.store(to.as_millis(), Ordering::SeqCst);
    }

    /// Move forward and return the new reading
    /// Saturates at `i64::MAX` milliseconds
    pub fn advance(&self, by: Duration) -> EpochMillis {
        let by = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        let step = |now: i64| Some(now.saturating_add(by));
        match self.now.fetch_update(Ordering::SeqCst, Ordering::SeqCst, step) {
            Ok(prev) | Err(prev) => EpochMillis(prev.saturating_add(by)),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> EpochMillis {
        EpochMillis(self.now.load(Ordering::SeqCst))
    }
}
