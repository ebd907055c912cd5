//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → CancelToken::cancel
//!
//! Cancellation (cancel.rs):
//!     CancelToken observed by the poller before each request,
//!     during the request, and while waiting on the scheduler
//! ```

pub mod cancel;
pub mod signals;

pub use cancel::CancelToken;
pub use signals::cancel_on_ctrl_c;
