//! Render server URL layout.

use url::Url;

use crate::poller::ResourceId;
use crate::transport::TransportError;

const STATUS_SEGMENT: &str = "is_ready";
const RENDER_SEGMENT: &str = "render";
const DISPLAY_SEGMENT: &str = "display";

/// Resolves status and render URLs for a resource against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse a base URL such as `http://localhost:8081/`.
    pub fn parse(base: &str) -> Result<Self, TransportError> {
        let url = Url::parse(base).map_err(|e| TransportError::InvalidBaseUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;
        Self::new(url)
    }

    pub fn new(base: Url) -> Result<Self, TransportError> {
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidBaseUrl {
                url: base.to_string(),
                reason: "URL cannot be a base".to_string(),
            });
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `POST` target answering whether `id` is ready.
    pub fn status_url(&self, id: &ResourceId) -> Url {
        self.resolve(STATUS_SEGMENT, id)
    }

    /// `GET` target serving the rendered image.
    pub fn render_url(&self, id: &ResourceId) -> Url {
        self.resolve(RENDER_SEGMENT, id)
    }

    /// Human-facing page for `id`.
    pub fn display_url(&self, id: &ResourceId) -> Url {
        self.resolve(DISPLAY_SEGMENT, id)
    }

    /// Server-relative image source, e.g. `/render/abc123`.
    pub fn render_path(&self, id: &ResourceId) -> String {
        self.render_url(id).path().to_string()
    }

    fn resolve(&self, kind: &str, id: &ResourceId) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        // Checked in `new`, so the segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(kind).push(id.as_str());
        }
        url
    }
}
