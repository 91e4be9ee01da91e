//! Clock page lifecycle scenarios
//!
//! All scenarios run on tokio's paused clock with a `ManualClock` as the
//! local wall clock, so every displayed instant is exact.

use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use tokio::sync::oneshot;
use tokio::time::sleep;

use netclock_core::{ClockOffset, EpochMillis, Unavailable};
use netclock_site::{ClockPage, ClockState, ClockStatus, ClockView, MountedClockPage};
use netclock_time::{Clock, Locale, Zone};

use crate::{ManualClock, ScriptedSource};

// 2024-01-01T00:00:00Z
const NEW_YEAR: EpochMillis = EpochMillis(1_704_067_200_000);
const SECOND: Duration = Duration::from_secs(1);

fn mount(
    source: ScriptedSource,
    clock: &Arc<ManualClock>,
) -> (Arc<ScriptedSource>, MountedClockPage) {
    let source = Arc::new(source);
    let page = ClockPage::new(source.clone(), clock.clone()).mount();
    (source, page)
}

async fn synced(page: &MountedClockPage) -> ClockState {
    let mut rx = page.subscribe();
    let state = *rx.wait_for(|s| !s.is_loading()).await.unwrap();
    state
}

/// Advance the local clock by one period and wait for the refresh it triggers
async fn tick(page: &MountedClockPage, clock: &ManualClock) -> ClockState {
    let mut rx = page.subscribe();
    rx.borrow_and_update();
    clock.advance(SECOND);
    rx.changed().await.unwrap();
    let state = *rx.borrow();
    state
}

// ============================================================================
// SUCCESSFUL SYNC
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_new_year_scenario() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let authoritative = NEW_YEAR + ClockOffset::from_millis(10_000);
    let (_, page) = mount(ScriptedSource::answering(authoritative), &clock);

    let state = synced(&page).await;
    assert_eq!(state.offset(), ClockOffset::from_millis(10_000));
    assert!(!state.is_degraded());
    assert_eq!(state.displayed, None);

    let state = tick(&page, &clock).await;
    assert_eq!(state.displayed, Some(EpochMillis(1_704_067_211_000)));

    let view = ClockView::build(&state, &Zone::Utc, Locale::ZhCn);
    assert_eq!(view.faces()[1].time, "00:00:11");
    assert_eq!(view.faces()[1].date, "2024年1月1日星期一");

    page.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_every_tick_is_local_now_plus_offset() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (source, page) = mount(
        ScriptedSource::answering(NEW_YEAR + ClockOffset::from_millis(-2_750)),
        &clock,
    );
    synced(&page).await;

    for _ in 0..5 {
        let state = tick(&page, &clock).await;
        assert_eq!(
            state.displayed,
            Some(clock.now() + ClockOffset::from_millis(-2_750))
        );
    }

    // One fetch per mount, regardless of ticks
    assert_eq!(source.calls(), 1);
    page.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_offset_sampled_when_response_arrives() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let authoritative = NEW_YEAR + ClockOffset::from_millis(10_000);
    let (_, page) = mount(
        ScriptedSource::answering(authoritative).after(Duration::from_secs(3)),
        &clock,
    );

    // The local clock moves while the request is in flight
    clock.advance(Duration::from_millis(1_500));

    let state = synced(&page).await;
    assert_eq!(state.offset(), ClockOffset::from_millis(8_500));
    page.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_faces_render_the_same_instant() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (_, page) = mount(ScriptedSource::answering(NEW_YEAR), &clock);
    synced(&page).await;
    let state = tick(&page, &clock).await;

    let local = Zone::fixed("Asia/Tokyo", chrono_offset(9));
    let view = ClockView::build(&state, &local, Locale::ZhCn);
    let faces = view.faces();

    assert_eq!(faces[0].time, "09:00:01");
    assert_eq!(faces[1].time, "00:00:01");
    assert_eq!(faces[0].date, faces[1].date);
    page.unmount().await;
}

fn chrono_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap()
}

// ============================================================================
// DEGRADED MODE
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_failure_tracks_local_clock() {
    for reason in [
        Unavailable::Network("connection refused".into()),
        Unavailable::Status(503),
        Unavailable::Malformed("missing field `utc_datetime`".into()),
    ] {
        let clock = Arc::new(ManualClock::at(NEW_YEAR));
        let (source, page) = mount(ScriptedSource::failing(reason), &clock);

        let state = synced(&page).await;
        assert_eq!(
            state.status,
            ClockStatus::Synced {
                offset: ClockOffset::ZERO,
                degraded: true
            }
        );

        for _ in 0..3 {
            let state = tick(&page, &clock).await;
            assert_eq!(state.displayed, Some(clock.now()));
        }

        // No retry
        assert_eq!(source.calls(), 1);
        page.unmount().await;
    }
}

// ============================================================================
// LOADING PHASE
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_no_tick_before_sync() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (_, page) = mount(
        ScriptedSource::answering(NEW_YEAR).after(Duration::from_secs(5)),
        &clock,
    );

    sleep(Duration::from_secs(3)).await;
    assert_eq!(page.state(), ClockState::LOADING);

    let state = synced(&page).await;
    assert_eq!(state.displayed, None);

    let first = tick(&page, &clock).await;
    assert!(first.displayed.is_some());
    page.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_every_observed_state_respects_phase_order() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (_, page) = mount(
        ScriptedSource::answering(NEW_YEAR).after(Duration::from_millis(2_500)),
        &clock,
    );
    let mut rx = page.subscribe();
    let mut seen = vec![*rx.borrow_and_update()];

    while seen.iter().filter(|s| s.displayed.is_some()).count() < 3 {
        rx.changed().await.unwrap();
        seen.push(*rx.borrow_and_update());
    }

    let first_synced = seen.iter().position(|s| !s.is_loading()).unwrap();
    assert!(seen[..first_synced].iter().all(|s| s.displayed.is_none()));
    assert_eq!(seen[first_synced].displayed, None);
    page.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_hung_fetch_stays_loading() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (source, page) = mount(ScriptedSource::hanging(), &clock);

    sleep(Duration::from_secs(3600)).await;
    assert!(page.state().is_loading());
    assert_eq!(source.calls(), 1);

    // Unmount still completes with the fetch outstanding
    page.unmount().await;
}

// ============================================================================
// UNMOUNT
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_unmount_stops_updates() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (_, page) = mount(ScriptedSource::answering(NEW_YEAR), &clock);
    synced(&page).await;
    let last = tick(&page, &clock).await;

    let mut rx = page.subscribe();
    rx.borrow_and_update();
    page.unmount().await;

    clock.advance(Duration::from_secs(10));
    sleep(Duration::from_secs(10)).await;

    assert!(rx.changed().await.is_err());
    assert_eq!(*rx.borrow(), last);
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_refresh() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (_, page) = mount(ScriptedSource::answering(NEW_YEAR), &clock);
    synced(&page).await;

    let mut rx = page.subscribe();
    rx.borrow_and_update();
    drop(page);

    assert!(rx.changed().await.is_err());
    assert_eq!(rx.borrow().displayed, None);
}

#[tokio::test(start_paused = true)]
async fn test_remount_starts_from_loading() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let source = Arc::new(ScriptedSource::answering(NEW_YEAR).after(SECOND));

    let page = ClockPage::new(source.clone(), clock.clone()).mount();
    synced(&page).await;
    page.unmount().await;

    let page = ClockPage::new(source.clone(), clock.clone()).mount();
    assert!(page.state().is_loading());
    synced(&page).await;
    assert_eq!(source.calls(), 2);
    page.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn test_custom_refresh_interval() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let page = ClockPage::new(Arc::new(ScriptedSource::answering(NEW_YEAR)), clock.clone())
        .with_refresh_interval(Duration::from_millis(250))
        .mount();
    synced(&page).await;

    let mut rx = page.subscribe();
    rx.borrow_and_update();
    let start = tokio::time::Instant::now();
    rx.changed().await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(250));
    page.unmount().await;
}

// ============================================================================
// TERMINAL WATCH
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_watch_prints_every_update_until_shutdown() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (source, page) = mount(ScriptedSource::answering(NEW_YEAR), &clock);
    let mut rx = page.subscribe();
    let (stop, stopped) = oneshot::channel::<()>();
    let mut out = Vec::new();

    let printing = page.watch(&Zone::Utc, Locale::ZhCn, &mut out, async {
        let _ = stopped.await;
    });
    let driving = async {
        rx.wait_for(|s| !s.is_loading()).await.unwrap();
        for _ in 0..3 {
            rx.borrow_and_update();
            clock.advance(SECOND);
            rx.changed().await.unwrap();
        }
        // Well before the next refresh is due
        sleep(Duration::from_millis(100)).await;
        stop.send(()).unwrap();
    };
    let (printed, ()) = tokio::join!(printing, driving);
    printed.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with(&ClockView::Loading.render_text()));
    assert!(text.contains("UTC标准时间\n  --:--:--"));
    for second in ["00:00:01", "00:00:02", "00:00:03"] {
        assert!(text.contains(second), "missing {second} in:\n{text}");
    }
    assert!(!text.contains("00:00:04"));

    // Shutdown unmounted the page
    assert!(rx.changed().await.is_err());
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_watch_shutdown_while_loading() {
    let clock = Arc::new(ManualClock::at(NEW_YEAR));
    let (source, page) = mount(ScriptedSource::hanging(), &clock);
    let mut rx = page.subscribe();
    let mut out = Vec::new();

    page.watch(&Zone::Utc, Locale::EnUs, &mut out, sleep(Duration::from_secs(30)))
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, format!("{}\n\n", ClockView::Loading.render_text()));
    assert_eq!(source.calls(), 1);
    assert!(rx.changed().await.is_err());
}
