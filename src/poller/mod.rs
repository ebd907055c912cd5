//! Polling subsystem.
//!
//! # Data Flow
//! ```text
//! run(identifier, initial_backoff)
//!     → transport: POST /is_ready/{identifier}
//!     → dispatch.rs (classify body: ready / pending / unrecognized)
//!     → runner.rs
//!         ready        → view: hide loading, attach /render/{identifier}
//!         pending      → scheduler.rs waits backoff * 1000 ms, backoff *= 1.5
//!         unrecognized → view: alert, then as pending
//! ```

pub mod dispatch;
pub mod runner;
pub mod scheduler;
pub mod types;

pub use runner::{ImagePoller, PollerSettings, Step, GIVING_UP_NOTICE};
pub use scheduler::{RecordingScheduler, Scheduler, TokioScheduler};
pub use types::{EmptyResourceId, PollReport, PollResult, PollState, ResourceId};
