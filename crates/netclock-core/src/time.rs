//! Time primitives for netclock
//!
//! Two quantities are used everywhere:
//! - EpochMillis: an absolute wall-clock reading, milliseconds since the Unix epoch (UTC)
//! - ClockOffset: a signed correction between two clocks, in milliseconds

use std::ops::{Add, Sub};

use chrono::{DateTime, TimeZone, Utc};

/// Wall-clock instant
/// Represented as milliseconds since 1970-01-01T00:00:00Z
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EpochMillis(pub i64);

impl EpochMillis {
    pub const UNIX_EPOCH: EpochMillis = EpochMillis(0);

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        EpochMillis(millis)
    }

    #[inline]
    pub fn from_secs(secs: i64) -> Self {
        EpochMillis(secs.saturating_mul(1000))
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        EpochMillis(dt.timestamp_millis())
    }

    /// Convert to a UTC datetime
    /// Returns None when the value is outside chrono's representable range
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }
}

impl Add<ClockOffset> for EpochMillis {
    type Output = EpochMillis;

    #[inline]
    fn add(self, rhs: ClockOffset) -> Self::Output {
        EpochMillis(self.0.saturating_add(rhs.0))
    }
}

impl Sub<EpochMillis> for EpochMillis {
    type Output = ClockOffset;

    /// Signed distance from `rhs` to `self`
    #[inline]
    fn sub(self, rhs: EpochMillis) -> Self::Output {
        ClockOffset(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for EpochMillis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "EpochMillis({})", dt.to_rfc3339()),
            None => write!(f, "EpochMillis({}ms)", self.0),
        }
    }
}

/// Clock offset - authoritative reading minus local reading
/// Positive when the local clock runs behind
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockOffset(pub i64);

impl ClockOffset {
    pub const ZERO: ClockOffset = ClockOffset(0);

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        ClockOffset(millis)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

impl std::fmt::Debug for ClockOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClockOffset({:+}ms)", self.0)
    }
}

impl std::fmt::Display for ClockOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}ms", self.0)
    }
}
