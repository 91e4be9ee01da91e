//! Scripted time sources

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use netclock_core::{EpochMillis, NetclockResult, Unavailable};
use netclock_time::TimeSource;

#[derive(Clone, Debug)]
enum Script {
    Answer(EpochMillis),
    Fail(Unavailable),
    Hang,
}

/// Time source with a predetermined outcome
#[derive(Debug)]
pub struct ScriptedSource {
    script: Script,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(script: Script) -> Self {
        ScriptedSource {
            script,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answers with `at`
    pub fn answering(at: EpochMillis) -> Self {
        Self::new(Script::Answer(at))
    }

    /// Always fails with `reason`
    pub fn failing(reason: Unavailable) -> Self {
        Self::new(Script::Fail(reason))
    }

    /// Never resolves
    pub fn hanging() -> Self {
        Self::new(Script::Hang)
    }

    /// Resolve only after `delay` (tokio time)
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimeSource for ScriptedSource {
    async fn fetch(&self) -> NetclockResult<EpochMillis> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.script {
            Script::Answer(at) => Ok(*at),
            Script::Fail(reason) => Err(reason.clone().into()),
            Script::Hang => std::future::pending().await,
        }
    }

    fn describe(&self) -> &str {
        "scripted"
    }
}
