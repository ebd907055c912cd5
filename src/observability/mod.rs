//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Poller, transport, CLI produce:
//!     → logging.rs (structured tracing events, stderr)
//!     → metrics.rs (counters, histograms; optional Prometheus endpoint)
//! ```
//!
//! # Design Decisions
//! - Every sequence runs inside a `poll` span carrying `sequence_id`
//!   and `identifier`
//! - Metrics are cheap no-ops unless an exporter is installed

pub mod logging;
pub mod metrics;
