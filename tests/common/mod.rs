//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::Router;
use tokio::net::TcpListener;

/// Smallest valid PNG signature, enough to tell bytes apart.
#[allow(dead_code)]
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nmock-render";

/// What the mock answers to one status check.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn text(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    #[allow(dead_code)]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[allow(dead_code)]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A status request as the mock saw it.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct StatusCall {
    pub id: String,
    pub method: Method,
    pub content_type: Option<String>,
    pub body_len: usize,
}

type Responder = dyn Fn(&str, usize) -> MockReply + Send + Sync;

#[derive(Clone)]
struct MockState {
    responder: Arc<Responder>,
    counts: Arc<Mutex<HashMap<String, usize>>>,
    calls: Arc<Mutex<Vec<StatusCall>>>,
}

/// Handle to a running mock render server.
pub struct MockRenderServer {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<StatusCall>>>,
    counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockRenderServer {
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn calls(&self) -> Vec<StatusCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, id: &str) -> usize {
        self.counts.lock().unwrap().get(id).copied().unwrap_or(0)
    }
}

/// Start a mock render server on an ephemeral loopback port.
///
/// `responder` gets the identifier and how many status checks for it came
/// before this one. `/render/{id}` serves [`PNG_BYTES`] once a check for
/// `id` has answered `ok`, and 404 before that.
pub async fn start_render_server<F>(responder: F) -> MockRenderServer
where
    F: Fn(&str, usize) -> MockReply + Send + Sync + 'static,
{
    let state = MockState {
        responder: Arc::new(responder),
        counts: Arc::new(Mutex::new(HashMap::new())),
        calls: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/is_ready/{id}", any(is_ready))
        .route("/render/{id}", get(render))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockRenderServer {
        addr,
        calls: state.calls,
        counts: state.counts,
    }
}

/// Start a mock that answers each identifier with `script` in order,
/// repeating the last entry.
#[allow(dead_code)]
pub async fn start_scripted_server(script: &'static [&'static str]) -> MockRenderServer {
    start_render_server(move |_, n| MockReply::text(script[n.min(script.len() - 1)])).await
}

async fn is_ready(
    State(state): State<MockState>,
    Path(id): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let n = {
        let mut counts = state.counts.lock().unwrap();
        let count = counts.entry(id.clone()).or_insert(0);
        let n = *count;
        *count += 1;
        n
    };
    state.calls.lock().unwrap().push(StatusCall {
        id: id.clone(),
        method,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body_len: body.len(),
    });

    let reply = (state.responder)(&id, n);
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
    (status, reply.body)
}

async fn render(State(state): State<MockState>, Path(id): Path<String>) -> impl IntoResponse {
    let seen = state.counts.lock().unwrap().get(&id).copied().unwrap_or(0);
    let ready = (0..seen).any(|n| (state.responder)(&id, n).body == "ok");
    if ready {
        (StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], PNG_BYTES.to_vec()).into_response()
    } else {
        (StatusCode::NOT_FOUND, "blob is nil").into_response()
    }
}
