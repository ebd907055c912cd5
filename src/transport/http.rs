//! HTTP transport backed by reqwest.

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::TransportConfig;
use crate::transport::{Transport, TransportError};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Talks to a live render server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(TransportError::Client)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: Url) -> BoxFuture<'_, Result<String, TransportError>> {
        Box::pin(async move {
            let target = url.to_string();
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body("")
                .send()
                .await
                .map_err(|source| TransportError::Request {
                    url: target.clone(),
                    source,
                })?;

            let status = response.status();
            let body = response.text().await.map_err(|source| TransportError::Body {
                url: target.clone(),
                source,
            })?;

            tracing::trace!(url = %target, status = %status, body_len = body.len(), "Status check completed");
            Ok(body)
        })
    }

    fn fetch_render(&self, url: Url) -> BoxFuture<'_, Result<Vec<u8>, TransportError>> {
        Box::pin(async move {
            let target = url.to_string();
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|source| TransportError::Request {
                    url: target.clone(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    url: target,
                    status: status.as_u16(),
                });
            }

            let bytes = response.bytes().await.map_err(|source| TransportError::Body {
                url: target.clone(),
                source,
            })?;
            tracing::debug!(url = %target, bytes = bytes.len(), "Render fetched");
            Ok(bytes.to_vec())
        })
    }
}
