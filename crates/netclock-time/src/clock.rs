//! Clock implementations for netclock

use std::sync::Arc;

use chrono::Utc;
use netclock_core::{ClockOffset, EpochMillis};

/// Source of "now" for the page
///
/// Implementations must be cheap; the refresh loop reads the clock on every tick.
pub trait Clock: Send + Sync {
    /// Current wall-clock reading
    fn now(&self) -> EpochMillis;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> EpochMillis {
        (**self).now()
    }
}

/// The operating system wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn now(&self) -> EpochMillis {
        EpochMillis::from_datetime(&Utc::now())
    }
}

/// Local clock shifted by a fixed offset
/// INVARIANT: the offset never changes after construction
pub struct CorrectedClock<C> {
    base: C,
    offset: ClockOffset,
}

impl<C: Clock> CorrectedClock<C> {
    pub fn new(base: C, offset: ClockOffset) -> Self {
        CorrectedClock { base, offset }
    }
}

impl<C: Clock> Clock for CorrectedClock<C> {
    fn now(&self) -> EpochMillis {
        self.base.now() + self.offset
    }
}
