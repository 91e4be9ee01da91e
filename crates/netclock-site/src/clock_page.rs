//! Network clock page
//!
//! Lifecycle:
//! 1. Mount: state is `Loading`, nothing displayed
//! 2. One fetch against the time source resolves the offset (0 on failure)
//! 3. Every refresh interval: displayed = local now + offset
//! 4. Unmount: the refresh task is cancelled, no further updates
//!
//! A single task owns every state transition and publishes snapshots on a
//! watch channel, so readers never observe a half-applied update.

use std::fmt::Write;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use netclock_core::{ClockOffset, EpochMillis, NetclockResult};
use netclock_time::{
    format_date, format_time, Clock, CorrectedClock, Locale, SyncOutcome, Synchronizer,
    TimeSource, Zone,
};

use crate::layout::{escape, heading, render_page, PageMeta, Style};

pub const PAGE_TITLE: &str = "标准网络时钟";
pub const PAGE_DESCRIPTION: &str = "Network Time Protocol Clock";
pub const PAGE_HEADING: &str = "网络校时";
pub const SYNCING_MESSAGE: &str = "正在从原子钟服务器同步时间...";
pub const LOCAL_LABEL: &str = "本设备时区";
pub const UTC_LABEL: &str = "UTC标准时间";
pub const UTC_CAPTION: &str = "Coordinated Universal Time";
pub const SOURCE_NOTE: &str = "* 时间源自 worldtimeapi.org，已自动计算传输延迟补偿";

const CONTAINER_STYLE: Style = Style(&[
    ("display", "flex"),
    ("flex-direction", "column"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("min-height", "60vh"),
    ("text-align", "center"),
    ("padding", "2rem"),
]);
const HEADING_STYLE: Style = Style(&[("margin-bottom", "3rem")]);
const FACES_STYLE: Style = Style(&[
    ("display", "flex"),
    ("gap", "4rem"),
    ("flex-wrap", "wrap"),
    ("justify-content", "center"),
]);
const CARD_STYLE: Style = Style(&[
    ("background", "var(--ifm-card-background-color)"),
    ("padding", "2rem"),
    ("border-radius", "12px"),
    ("box-shadow", "0 4px 12px rgba(0,0,0,0.1)"),
    ("min-width", "300px"),
]);
const TIME_STYLE: Style = Style(&[
    ("font-size", "3.5rem"),
    ("font-weight", "bold"),
    ("font-family", "monospace"),
    ("margin", "1rem 0"),
    ("color", "var(--ifm-color-primary)"),
]);
const DATE_STYLE: Style = Style(&[("font-size", "1.2rem"), ("font-weight", "500")]);
const CAPTION_STYLE: Style = Style(&[("color", "#888")]);
const NOTE_STYLE: Style = Style(&[
    ("margin-top", "3rem"),
    ("opacity", "0.6"),
    ("font-size", "0.9rem"),
]);

/// Synchronization phase of the page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockStatus {
    /// Waiting for the one-shot fetch
    Loading,
    /// Offset finalized; `degraded` when the fetch failed and offset is 0
    Synced { offset: ClockOffset, degraded: bool },
}

/// Snapshot of the page state
/// INVARIANT: `displayed` is None while `status` is Loading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockState {
    pub status: ClockStatus,
    pub displayed: Option<EpochMillis>,
}

impl ClockState {
    pub const LOADING: ClockState = ClockState {
        status: ClockStatus::Loading,
        displayed: None,
    };

    fn synced(outcome: &SyncOutcome) -> Self {
        ClockState {
            status: ClockStatus::Synced {
                offset: outcome.offset,
                degraded: outcome.is_degraded(),
            },
            displayed: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, ClockStatus::Loading)
    }

    /// Applied offset, 0 until synced
    pub fn offset(&self) -> ClockOffset {
        match self.status {
            ClockStatus::Loading => ClockOffset::ZERO,
            ClockStatus::Synced { offset, .. } => offset,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, ClockStatus::Synced { degraded: true, .. })
    }
}

/// An unmounted clock page
pub struct ClockPage {
    synchronizer: Synchronizer,
    refresh_interval: Duration,
}

impl ClockPage {
    pub fn new(source: Arc<dyn TimeSource>, clock: Arc<dyn Clock>) -> Self {
        ClockPage {
            synchronizer: Synchronizer::new(source, clock),
            refresh_interval: Duration::from_secs(1),
        }
    }

    /// Override the refresh period (default 1s)
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.refresh_interval = interval;
        }
        self
    }

    /// Start the page: spawns the sync-then-refresh task on the current runtime
    pub fn mount(self) -> MountedClockPage {
        let (tx, rx) = watch::channel(ClockState::LOADING);
        tracing::debug!(
            refresh = %humantime::format_duration(self.refresh_interval),
            "mounting clock page"
        );
        let task = tokio::spawn(run_page(self.synchronizer, self.refresh_interval, tx));
        MountedClockPage {
            state: rx,
            task: Some(task),
        }
    }
}

/// A running clock page
///
/// Dropping the handle cancels the refresh task; `unmount` also waits for it
/// to stop.
pub struct MountedClockPage {
    state: watch::Receiver<ClockState>,
    task: Option<JoinHandle<()>>,
}

impl MountedClockPage {
    /// Latest snapshot
    pub fn state(&self) -> ClockState {
        *self.state.borrow()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ClockState> {
        self.state.clone()
    }

    /// Cancel the refresh task and wait until it is gone
    pub async fn unmount(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            tracing::debug!("clock page unmounted");
        }
    }

    /// Write the text rendering to `out` on every state change until
    /// `shutdown` resolves, then unmount
    pub async fn watch<W, F>(
        self,
        local: &Zone,
        locale: Locale,
        out: &mut W,
        shutdown: F,
    ) -> NetclockResult<()>
    where
        W: io::Write,
        F: Future<Output = ()>,
    {
        let mut updates = self.subscribe();
        tokio::pin!(shutdown);

        let result = loop {
            let state = *updates.borrow_and_update();
            let text = ClockView::build(&state, local, locale).render_text();
            let frame = format!("{text}\n\n");
            if let Err(e) = out.write_all(frame.as_bytes()).and_then(|()| out.flush()) {
                break Err(e.into());
            }

            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break Ok(());
                    }
                }
                _ = &mut shutdown => break Ok(()),
            }
        };

        self.unmount().await;
        result
    }
}

impl Drop for MountedClockPage {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_page(sync: Synchronizer, interval: Duration, tx: watch::Sender<ClockState>) {
    let outcome = sync.synchronize().await;
    let clock = CorrectedClock::new(Arc::clone(sync.clock()), outcome.offset);
    tx.send_replace(ClockState::synced(&outcome));

    // First refresh one full period after sync
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if tx.is_closed() {
            break;
        }
        let now = clock.now();
        tx.send_modify(|state| state.displayed = Some(now));
    }
}

/// One rendered clock face
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClockFace {
    pub label: &'static str,
    pub zone: String,
    pub caption: String,
    pub time: String,
    pub date: String,
}

/// What the page shows for a given state
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClockView {
    Loading,
    /// Local face first, UTC second, both from the same instant
    Synced { faces: [ClockFace; 2] },
}

impl ClockView {
    pub fn build(state: &ClockState, local: &Zone, locale: Locale) -> Self {
        if state.is_loading() {
            return ClockView::Loading;
        }

        let instant = state.displayed;
        let face = |label, zone: &Zone, caption: String| ClockFace {
            label,
            zone: zone.name().to_string(),
            caption,
            time: format_time(instant, zone),
            date: format_date(instant, zone, locale),
        };

        ClockView::Synced {
            faces: [
                face(LOCAL_LABEL, local, local.name().to_string()),
                face(UTC_LABEL, &Zone::Utc, UTC_CAPTION.to_string()),
            ],
        }
    }

    pub fn faces(&self) -> &[ClockFace] {
        match self {
            ClockView::Loading => &[],
            ClockView::Synced { faces } => faces,
        }
    }

    /// Page body markup
    pub fn render_html(&self) -> String {
        let mut out = format!("<div{}>\n", CONTAINER_STYLE.attr());
        out.push_str(&heading(1, PAGE_HEADING, HEADING_STYLE));
        out.push('\n');

        match self {
            ClockView::Loading => {
                out.push_str(&heading(2, SYNCING_MESSAGE, Style(&[])));
                out.push('\n');
            }
            ClockView::Synced { faces } => {
                let _ = writeln!(out, "<div{}>", FACES_STYLE.attr());
                for face in faces {
                    let _ = writeln!(out, "<div class=\"clock-face\"{}>", CARD_STYLE.attr());
                    out.push_str(&heading(3, face.label, Style(&[])));
                    let _ = write!(
                        out,
                        "\n<div{}>{}</div>\n<div{}>{}</div>\n<small{}>{}</small>\n</div>\n",
                        TIME_STYLE.attr(),
                        escape(&face.time),
                        DATE_STYLE.attr(),
                        escape(&face.date),
                        CAPTION_STYLE.attr(),
                        escape(&face.caption),
                    );
                }
                out.push_str("</div>\n");
            }
        }

        let _ = write!(out, "<p{}>{}</p>\n</div>", NOTE_STYLE.attr(), escape(SOURCE_NOTE));
        out
    }

    /// Full document; the browser reloads every `refresh` to pick up new ticks
    pub fn render_document(&self, refresh: Duration, locale: Locale) -> String {
        let seconds = refresh.as_secs().max(1);
        let head = format!("<meta http-equiv=\"refresh\" content=\"{seconds}\">\n");
        render_page(
            &PageMeta::new(PAGE_TITLE, PAGE_DESCRIPTION).with_locale(locale),
            &head,
            &self.render_html(),
        )
    }

    /// Terminal rendering
    pub fn render_text(&self) -> String {
        let mut out = format!("{PAGE_HEADING}\n\n");
        match self {
            ClockView::Loading => {
                out.push_str(SYNCING_MESSAGE);
                out.push('\n');
            }
            ClockView::Synced { faces } => {
                for face in faces {
                    let _ = writeln!(
                        out,
                        "{}\n  {}\n  {}\n  {}\n",
                        face.label, face.time, face.date, face.caption
                    );
                }
            }
        }
        out.push_str(SOURCE_NOTE);
        out
    }
}
