//! Terminal view used by the CLI.
//!
//! Results go to stdout, debug text and alerts to stderr. Lines are
//! prefixed with the identifier so concurrent sequences stay readable.

use crate::poller::ResourceId;
use crate::transport::Endpoints;
use crate::view::View;

pub struct ConsoleView {
    label: String,
    endpoints: Endpoints,
}

impl ConsoleView {
    /// `endpoints` turns server-relative image sources into absolute URLs.
    pub fn new(id: &ResourceId, endpoints: Endpoints) -> Self {
        Self {
            label: id.to_string(),
            endpoints,
        }
    }

    fn absolute(&self, src: &str) -> String {
        match self.endpoints.base().join(src) {
            Ok(url) => url.to_string(),
            Err(_) => src.to_string(),
        }
    }

    fn metadata_link(&self, id: &ResourceId) -> String {
        self.endpoints.display_url(id).to_string()
    }
}

impl View for ConsoleView {
    fn hide_loading(&self) {
        tracing::debug!(identifier = %self.label, "Loading indicator hidden");
    }

    fn attach_image(&self, src: &str) {
        println!("[{}] ready: {}", self.label, self.absolute(src));
    }

    fn show_debug(&self, text: &str) {
        eprintln!("[{}] {}", self.label, text);
    }

    fn show_metadata(&self, id: &ResourceId) {
        println!("[{}] page: {}", self.label, self.metadata_link(id));
    }

    fn alert(&self, text: &str) {
        eprintln!("[{}] ALERT: {}", self.label, text);
    }
}
