//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! Poller
//!     → endpoints.rs (identifier → /is_ready/{id}, /render/{id})
//!     → Transport::post (one POST, body text returned as-is)
//!     → Poller inspects the body
//! ```
//!
//! # Design Decisions
//! - The body is returned regardless of HTTP status; callers decide
//! - No retry here; retry belongs to the poller
//! - No timeout unless configured

pub mod endpoints;
pub mod http;
pub mod scripted;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;
use url::Url;

pub use endpoints::Endpoints;
pub use http::HttpTransport;
pub use scripted::ScriptedTransport;

/// Errors raised while talking to the render server.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The base URL cannot have paths appended to it.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Sending the request failed (connect, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read.
    #[error("reading response from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A render fetch returned a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The server could not be reached (scripted transports).
    #[error("server unreachable: {0}")]
    Unreachable(String),
}

/// One-shot asynchronous requests to the render server.
pub trait Transport: Send + Sync {
    /// POST an empty form to `url` and return the response body text.
    fn post(&self, url: Url) -> BoxFuture<'_, Result<String, TransportError>>;

    /// GET the rendered resource at `url`.
    fn fetch_render(&self, url: Url) -> BoxFuture<'_, Result<Vec<u8>, TransportError>>;
}

/// Spawn a POST and hand its outcome to `on_complete` exactly once.
///
/// Concurrent calls are independent: each callback only ever sees the
/// response to its own request.
pub fn post_with_callback<F>(
    transport: Arc<dyn Transport>,
    url: Url,
    on_complete: F,
) -> tokio::task::JoinHandle<()>
where
    F: FnOnce(Result<String, TransportError>) + Send + 'static,
{
    tokio::spawn(async move {
        let result = transport.post(url).await;
        on_complete(result);
    })
}
