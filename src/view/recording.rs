//! Headless view that records every event.

use std::sync::Mutex;

use crate::poller::ResourceId;
use crate::view::{View, ViewEvent};

#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events so far, oldest first.
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Sources of every attached image.
    pub fn images(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::AttachImage(src) => Some(src),
                _ => None,
            })
            .collect()
    }

    /// Every alert text.
    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Alert(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// The most recent debug text, if any.
    pub fn debug_text(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|event| match event {
            ViewEvent::Debug(text) => Some(text),
            _ => None,
        })
    }

    fn push(&self, event: ViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

impl View for RecordingView {
    fn hide_loading(&self) {
        self.push(ViewEvent::HideLoading);
    }

    fn attach_image(&self, src: &str) {
        self.push(ViewEvent::AttachImage(src.to_string()));
    }

    fn show_debug(&self, text: &str) {
        self.push(ViewEvent::Debug(text.to_string()));
    }

    fn show_metadata(&self, id: &ResourceId) {
        self.push(ViewEvent::Metadata(id.to_string()));
    }

    fn alert(&self, text: &str) {
        self.push(ViewEvent::Alert(text.to_string()));
    }
}
