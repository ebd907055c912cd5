//! Retry budget for a polling sequence.
//!
//! Without limits a sequence retries forever. Either limit turns the next
//! retry that would cross it into a terminal failure.

use std::time::Duration;

use serde::Serialize;

use crate::config::LimitsConfig;

/// Why a sequence stopped retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exhausted {
    /// `max_attempts` status checks were made.
    MaxAttempts,
    /// Waiting for the next attempt would overrun the elapsed budget.
    Deadline,
}

impl std::fmt::Display for Exhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exhausted::MaxAttempts => write!(f, "attempt limit reached"),
            Exhausted::Deadline => write!(f, "time budget exhausted"),
        }
    }
}

/// Attempt and elapsed-time limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryBudget {
    max_attempts: Option<u32>,
    max_elapsed: Option<Duration>,
}

impl RetryBudget {
    /// No limits.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LimitsConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            max_elapsed: config.max_elapsed_secs.map(Duration::from_secs),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = Some(max_elapsed);
        self
    }

    /// Decide whether another attempt may be scheduled after `attempts`
    /// checks, `elapsed` time, and a pending `delay`.
    pub fn check(&self, attempts: u32, elapsed: Duration, delay: Duration) -> Result<(), Exhausted> {
        if let Some(max) = self.max_attempts {
            if attempts >= max {
                return Err(Exhausted::MaxAttempts);
            }
        }
        if let Some(max) = self.max_elapsed {
            if elapsed.saturating_add(delay) > max {
                return Err(Exhausted::Deadline);
            }
        }
        Ok(())
    }
}
