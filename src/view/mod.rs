//! Output surface for the poller.
//!
//! The poller never touches a concrete display. It is handed a `View`
//! and reports what should become visible.

pub mod console;
pub mod recording;

use serde::Serialize;

use crate::poller::ResourceId;

pub use console::ConsoleView;
pub use recording::RecordingView;

/// Where a polling sequence shows its progress.
pub trait View: Send + Sync {
    /// Hide the loading indicator.
    fn hide_loading(&self);

    /// Attach an image whose source is `src`.
    fn attach_image(&self, src: &str);

    /// Replace the debug/status text.
    fn show_debug(&self, text: &str);

    /// Show the metadata panel for a revealed resource.
    fn show_metadata(&self, id: &ResourceId);

    /// Alert the user synchronously.
    fn alert(&self, text: &str);
}

/// Something a view was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum ViewEvent {
    HideLoading,
    AttachImage(String),
    Debug(String),
    Metadata(String),
    Alert(String),
}
