//! Metrics collection and exposition.
//!
//! # Metrics
//! - `poller_attempts_total` (counter): status checks issued
//! - `poller_backoff_seconds` (histogram): backoff before each reschedule
//! - `poller_outcomes_total` (counter): finished sequences by `state`
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::poller::PollState;

/// Start the Prometheus exporter on `addr`.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_attempt() {
    ::metrics::counter!("poller_attempts_total").increment(1);
}

pub fn record_backoff(secs: f64) {
    ::metrics::histogram!("poller_backoff_seconds").record(secs);
}

pub fn record_outcome(state: &PollState) {
    ::metrics::counter!("poller_outcomes_total", "state" => state_label(state)).increment(1);
}

fn state_label(state: &PollState) -> &'static str {
    match state {
        PollState::Polling => "polling",
        PollState::Revealed => "revealed",
        PollState::ErrorDisplayed => "error_displayed",
        PollState::GaveUp(_) => "gave_up",
        PollState::Cancelled => "cancelled",
    }
}
