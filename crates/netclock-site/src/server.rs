//! HTTP site host
//!
//! Routes:
//! - `GET /`           homepage with the feature showcase
//! - `GET /time`       clock page rendered from the current snapshot
//! - `GET /time.json`  the same snapshot as JSON

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::watch;

use netclock_core::NetclockResult;
use netclock_time::{Clock, Locale, TimeSource, Zone};

use crate::clock_page::{ClockFace, ClockPage, ClockState, ClockStatus, ClockView, MountedClockPage};
use crate::config::SiteConfig;
use crate::showcase::render_home_page;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    clock: watch::Receiver<ClockState>,
    local_zone: Arc<Zone>,
    locale: Locale,
    refresh_interval: Duration,
}

impl AppState {
    pub fn new(
        clock: watch::Receiver<ClockState>,
        local_zone: Zone,
        locale: Locale,
        refresh_interval: Duration,
    ) -> Self {
        AppState {
            clock,
            local_zone: Arc::new(local_zone),
            locale,
            refresh_interval,
        }
    }

    fn view(&self) -> (ClockState, ClockView) {
        let state = *self.clock.borrow();
        let view = ClockView::build(&state, &self.local_zone, self.locale);
        (state, view)
    }
}

/// JSON form of the clock page
#[derive(Clone, Debug, Serialize)]
pub struct ClockSnapshot {
    pub status: &'static str,
    pub offset_ms: i64,
    pub degraded: bool,
    pub displayed_ms: Option<i64>,
    pub faces: Vec<ClockFace>,
}

impl ClockSnapshot {
    pub fn new(state: &ClockState, view: &ClockView) -> Self {
        ClockSnapshot {
            status: match state.status {
                ClockStatus::Loading => "loading",
                ClockStatus::Synced { .. } => "synced",
            },
            offset_ms: state.offset().as_millis(),
            degraded: state.is_degraded(),
            displayed_ms: state.displayed.map(|t| t.as_millis()),
            faces: view.faces().to_vec(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/time", get(time_page))
        .route("/time.json", get(time_json))
        .with_state(state)
}

async fn home() -> Html<String> {
    Html(render_home_page())
}

async fn time_page(State(app): State<AppState>) -> Html<String> {
    let (_, view) = app.view();
    Html(view.render_document(app.refresh_interval, app.locale))
}

async fn time_json(State(app): State<AppState>) -> Json<ClockSnapshot> {
    let (state, view) = app.view();
    Json(ClockSnapshot::new(&state, &view))
}

/// A bound, not yet serving, site
pub struct SiteServer {
    listener: TcpListener,
    page: MountedClockPage,
    state: AppState,
}

impl SiteServer {
    /// Bind the listener and mount the clock page
    pub async fn bind(
        config: &SiteConfig,
        source: Arc<dyn TimeSource>,
        clock: Arc<dyn Clock>,
        local_zone: Zone,
    ) -> NetclockResult<Self> {
        let listener = TcpListener::bind(config.server.listen).await?;
        let page = ClockPage::new(source, clock)
            .with_refresh_interval(config.clock.refresh_interval)
            .mount();
        let state = AppState::new(
            page.subscribe(),
            local_zone,
            config.clock.locale,
            config.clock.refresh_interval,
        );

        Ok(SiteServer {
            listener,
            page,
            state,
        })
    }

    pub fn local_addr(&self) -> NetclockResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then unmount the clock page
    pub async fn run<F>(self, shutdown: F) -> NetclockResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let SiteServer {
            listener,
            page,
            state,
        } = self;

        tracing::info!(addr = ?listener.local_addr().ok(), "site listening");
        let served = axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown)
            .await;

        page.unmount().await;
        tracing::info!("site stopped");
        Ok(served?)
    }
}
