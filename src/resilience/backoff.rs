//! Multiplicative backoff with optional jitter.

use std::time::Duration;
use rand::Rng;

use crate::config::BackoffConfig;

/// Backoff in seconds for the given attempt (1-based).
///
/// `initial * factor^(attempt - 1)`; attempt 0 has no delay.
pub fn calculate_backoff(attempt: u32, initial_secs: f64, factor: f64) -> f64 {
    if attempt == 0 {
        return 0.0;
    }
    let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
    initial_secs * factor.powi(exponent)
}

/// Current backoff of one polling sequence.
///
/// Tracks the attempt number; the value is always the closed form of
/// [`calculate_backoff`], so it only ever grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    initial_secs: f64,
    attempt: u32,
    factor: f64,
    jitter_ratio: f64,
}

impl Backoff {
    /// Default growth factor applied after each non-ready check.
    pub const DEFAULT_FACTOR: f64 = 1.5;

    /// Start a backoff at `initial_secs` with the default factor and no jitter.
    pub fn new(initial_secs: f64) -> Self {
        Self {
            initial_secs,
            attempt: 1,
            factor: Self::DEFAULT_FACTOR,
            jitter_ratio: 0.0,
        }
    }

    /// Start a backoff at `initial_secs`, taking growth and jitter from config.
    pub fn from_config(initial_secs: f64, config: &BackoffConfig) -> Self {
        Self {
            initial_secs,
            attempt: 1,
            factor: config.factor,
            jitter_ratio: config.jitter_ratio,
        }
    }

    pub fn with_jitter(mut self, jitter_ratio: f64) -> Self {
        self.jitter_ratio = jitter_ratio;
        self
    }

    /// Current backoff in seconds. May be infinite once growth overflows.
    pub fn secs(&self) -> f64 {
        calculate_backoff(self.attempt, self.initial_secs, self.factor)
    }

    /// Delay before the next attempt: `secs * 1000` ms, plus jitter.
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay(&self) -> Duration {
        let base_ms = (self.secs() * 1000.0).max(0.0);
        if !base_ms.is_finite() {
            return Duration::MAX;
        }
        let jitter_span = base_ms * self.jitter_ratio;
        let jitter_ms = if jitter_span > 0.0 && jitter_span.is_finite() {
            rand::thread_rng().gen_range(0.0..=jitter_span)
        } else {
            0.0
        };
        Duration::try_from_secs_f64((base_ms + jitter_ms) / 1000.0).unwrap_or(Duration::MAX)
    }

    /// The backoff that follows this one.
    pub fn next(self) -> Self {
        Self {
            attempt: self.attempt.saturating_add(1),
            ..self
        }
    }

    /// Whether the backoff has grown past `threshold_secs`.
    pub fn exceeds(&self, threshold_secs: f64) -> bool {
        self.secs() > threshold_secs
    }
}
