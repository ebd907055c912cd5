//! Poller data model.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::resilience::Exhausted;

/// Opaque name of the server-side artifact being awaited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("resource identifier must not be empty")]
pub struct EmptyResourceId;

impl ResourceId {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyResourceId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(EmptyResourceId);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResourceId {
    type Err = EmptyResourceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classified status body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    /// Body was exactly `ok`.
    Ready,
    /// Not ready yet (or the check failed).
    Pending,
    /// A body the server is not expected to send.
    Unrecognized(String),
}

/// Where a polling sequence currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Polling,
    /// Terminal success.
    Revealed,
    /// An unexpected body was alerted; polling continues.
    ErrorDisplayed,
    /// Terminal failure.
    GaveUp(Exhausted),
    /// Stopped through the cancellation token.
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Revealed | PollState::GaveUp(_) | PollState::Cancelled
        )
    }
}

/// Summary of one finished polling sequence.
#[derive(Debug, Clone, Serialize)]
pub struct PollReport {
    pub sequence_id: Uuid,
    pub identifier: ResourceId,
    pub state: PollState,
    /// Status checks issued.
    pub attempts: u32,
    /// Every delay handed to the scheduler, in milliseconds.
    pub delays_ms: Vec<u64>,
    pub elapsed_ms: u64,
    /// Source of the attached image, when revealed.
    pub image_src: Option<String>,
}

impl PollReport {
    pub fn is_revealed(&self) -> bool {
        self.state == PollState::Revealed
    }
}
