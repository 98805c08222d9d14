//! Shared fixtures: a controllable clock and stub shortening endpoints.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::RawQuery;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use giftlink::clock::Clock;

/// Controllable time source.
pub struct FakeClock {
    now_ms: AtomicI64,
}

impl FakeClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Spawn a stub shortening endpoint that answers `{"shorturl": ...}`.
pub async fn spawn_stub_shortener(short_url: &'static str) -> String {
    let app = Router::new().route(
        "/create.php",
        get(move || async move { axum::Json(serde_json::json!({ "shorturl": short_url })) }),
    );
    endpoint_url(spawn(app).await)
}

/// Spawn a stub that records incoming query strings before answering.
pub async fn spawn_recording_shortener(
    short_url: &'static str,
) -> (String, Arc<Mutex<Vec<String>>>) {
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let captured = seen.clone();
    let app = Router::new().route(
        "/create.php",
        get(move |RawQuery(query): RawQuery| {
            let captured = captured.clone();
            async move {
                captured
                    .lock()
                    .unwrap()
                    .push(query.unwrap_or_default());
                axum::Json(serde_json::json!({ "shorturl": short_url }))
            }
        }),
    );
    (endpoint_url(spawn(app).await), seen)
}

/// Spawn a stub that answers with a fixed status and raw body.
pub async fn spawn_stub_raw(status: u16, body: &'static str) -> String {
    let app = Router::new().route(
        "/create.php",
        get(move || async move {
            (
                StatusCode::from_u16(status).expect("valid status"),
                body,
            )
        }),
    );
    endpoint_url(spawn(app).await)
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn endpoint_url(addr: SocketAddr) -> String {
    format!("http://{}/create.php", addr)
}
