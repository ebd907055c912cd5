//! Transport that replays canned responses.
//!
//! Used for offline runs and tests: each `post` pops the next scripted
//! outcome and every requested URL is recorded.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use futures_util::future::BoxFuture;
use url::Url;

use crate::transport::{Transport, TransportError};

#[derive(Debug, Clone)]
enum Step {
    Body(String),
    Unreachable(String),
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    requests: Vec<Url>,
}

/// Replays scripted status bodies in order.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
    /// Body returned once the script runs out; `None` means unreachable.
    fallback: Option<String>,
    render: Vec<u8>,
}

impl ScriptedTransport {
    /// Script that answers with `bodies` in order.
    pub fn new<I, S>(bodies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps = bodies.into_iter().map(|b| Step::Body(b.into())).collect();
        Self {
            script: Mutex::new(Script {
                steps,
                requests: Vec::new(),
            }),
            ..Self::default()
        }
    }

    /// Empty script.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a body to the script.
    pub fn then_body(self, body: impl Into<String>) -> Self {
        self.lock().steps.push_back(Step::Body(body.into()));
        self
    }

    /// Append a connection failure to the script.
    pub fn then_unreachable(self, reason: impl Into<String>) -> Self {
        self.lock().steps.push_back(Step::Unreachable(reason.into()));
        self
    }

    /// Body returned for every request after the script is exhausted.
    pub fn with_fallback(mut self, body: impl Into<String>) -> Self {
        self.fallback = Some(body.into());
        self
    }

    /// Bytes served by `fetch_render`.
    pub fn with_render(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.render = bytes.into();
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<Url> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for ScriptedTransport {
    fn post(&self, url: Url) -> BoxFuture<'_, Result<String, TransportError>> {
        let step = {
            let mut script = self.lock();
            script.requests.push(url);
            script.steps.pop_front()
        };
        let result = match step {
            Some(Step::Body(body)) => Ok(body),
            Some(Step::Unreachable(reason)) => Err(TransportError::Unreachable(reason)),
            None => match &self.fallback {
                Some(body) => Ok(body.clone()),
                None => Err(TransportError::Unreachable("script exhausted".to_string())),
            },
        };
        Box::pin(async move { result })
    }

    fn fetch_render(&self, _url: Url) -> BoxFuture<'_, Result<Vec<u8>, TransportError>> {
        let bytes = self.render.clone();
        Box::pin(async move { Ok(bytes) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("http://localhost/is_ready/x").unwrap()
    }

    #[tokio::test]
    async fn test_replays_in_order_then_falls_back() {
        let transport = ScriptedTransport::new(["fail"])
            .then_unreachable("reset")
            .with_fallback("ok");

        assert_eq!(transport.post(url()).await.unwrap(), "fail");
        assert!(transport.post(url()).await.is_err());
        assert_eq!(transport.post(url()).await.unwrap(), "ok");
        assert_eq!(transport.post(url()).await.unwrap(), "ok");
        assert_eq!(transport.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_exhausted_without_fallback_is_unreachable() {
        let transport = ScriptedTransport::empty();
        assert!(matches!(
            transport.post(url()).await,
            Err(TransportError::Unreachable(_))
        ));
    }
}
