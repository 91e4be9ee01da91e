//! In-process world-time API
//!
//! Serves `GET /api/timezone/Etc/UTC` on an ephemeral loopback port with a
//! configurable reply, so the HTTP time source can be exercised without
//! leaving the machine.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Path the real service uses for UTC
pub const UTC_PATH: &str = "/api/timezone/Etc/UTC";

/// What the mock answers
#[derive(Clone, Debug)]
pub enum Reply {
    /// 200 with `{"utc_datetime": ..}` plus the usual neighbour fields
    UtcDatetime(String),
    /// Bare status code with an empty body
    Status(u16),
    /// 200 with an arbitrary body
    Raw(String),
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    hits: Arc<AtomicUsize>,
}

async fn answer(State(state): State<MockState>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    match state.reply {
        Reply::UtcDatetime(utc) => Json(serde_json::json!({
            "abbreviation": "UTC",
            "datetime": utc,
            "utc_datetime": utc,
            "timezone": "Etc/UTC",
        }))
        .into_response(),
        Reply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Reply::Raw(body) => body.into_response(),
    }
}

/// Running mock server; stops when dropped
pub struct MockTimeServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockTimeServer {
    pub async fn start(reply: Reply) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let hits = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = oneshot::channel::<()>();

        let app = Router::new().route(UTC_PATH, get(answer)).with_state(MockState {
            reply,
            hits: Arc::clone(&hits),
        });

        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
            if let Err(e) = served {
                tracing::warn!(error = %e, "mock time server failed");
            }
        });

        Ok(MockTimeServer {
            addr,
            hits,
            shutdown: Some(tx),
        })
    }

    /// Full URL of the UTC endpoint
    pub fn endpoint(&self) -> String {
        format!("http://{}{}", self.addr, UTC_PATH)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Requests served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockTimeServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
