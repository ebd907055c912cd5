//! Deferred execution between attempts.

use std::sync::Mutex;
use std::time::Duration;

use futures_util::future::BoxFuture;

/// Waits out a retry delay.
pub trait Scheduler: Send + Sync {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()>;
}

/// Real timer backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(delay))
    }
}

/// Records requested delays and returns at once.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Scheduler for RecordingScheduler {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()> {
        self.delays
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(delay);
        Box::pin(async {})
    }
}
