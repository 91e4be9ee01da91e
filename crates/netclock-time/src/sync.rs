//! One-shot synchronization against an authoritative source
//!
//! The offset is `authoritative - local`, with the local reading sampled
//! when the response arrives. Request latency is not compensated.

use std::sync::Arc;

use netclock_core::{ClockOffset, EpochMillis, NetclockResult};

use crate::{Clock, TimeSource};

/// Result of a synchronization attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Correction to apply to the local clock
    pub offset: ClockOffset,
    /// Authoritative reading, None when the source failed
    pub authoritative: Option<EpochMillis>,
}

impl SyncOutcome {
    /// Local-clock-only operation after a failed attempt
    pub fn is_degraded(&self) -> bool {
        self.authoritative.is_none()
    }
}

/// Measures the offset between a local clock and a time source
#[derive(Clone)]
pub struct Synchronizer {
    source: Arc<dyn TimeSource>,
    clock: Arc<dyn Clock>,
}

impl Synchronizer {
    pub fn new(source: Arc<dyn TimeSource>, clock: Arc<dyn Clock>) -> Self {
        Synchronizer { source, clock }
    }

    /// Fetch once and compute the offset, propagating source failures
    pub async fn measure(&self) -> NetclockResult<SyncOutcome> {
        tracing::debug!(source = self.source.describe(), "fetching authoritative time");
        let authoritative = self.source.fetch().await?;
        let local = self.clock.now();

        Ok(SyncOutcome {
            offset: authoritative - local,
            authoritative: Some(authoritative),
        })
    }

    /// Fetch once; on any failure fall back to the unmodified local clock
    pub async fn synchronize(&self) -> SyncOutcome {
        match self.measure().await {
            Ok(outcome) => {
                tracing::info!(
                    source = self.source.describe(),
                    offset_ms = outcome.offset.as_millis(),
                    "clock synchronized"
                );
                outcome
            }
            Err(e) => {
                tracing::warn!(
                    source = self.source.describe(),
                    error = %e,
                    "clock synchronization failed, using local time"
                );
                SyncOutcome {
                    offset: ClockOffset::ZERO,
                    authoritative: None,
                }
            }
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
