//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Status check did not report ready:
//!     → budget.rs (may another attempt be scheduled?)
//!     → backoff.rs (how long to wait, how much to grow)
//! ```
//!
//! # Design Decisions
//! - Backoff grows multiplicatively (factor 1.5 by default)
//! - Limits are opt-in; an unbounded budget retries forever

pub mod backoff;
pub mod budget;

pub use backoff::{calculate_backoff, Backoff};
pub use budget::{Exhausted, RetryBudget};
