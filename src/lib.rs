//! Render readiness poller.
//!
//! Asks a render server whether an image is ready and reveals it once it
//! is, backing off by a factor of 1.5 between checks.
//!
//! ```text
//!   ImagePoller ──POST /is_ready/{id}──▶ Transport ──▶ render server
//!        │ ◀───────────── body ─────────────┘
//!        ├─ "ok"   → View: hide loading, attach /render/{id}
//!        └─ other  → Scheduler: wait backoff, backoff *= 1.5
//! ```

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod poller;
pub mod resilience;
pub mod transport;
pub mod view;

pub use config::PollerConfig;
pub use lifecycle::CancelToken;
pub use poller::{ImagePoller, PollReport, PollState, ResourceId};
pub use transport::{Endpoints, HttpTransport, Transport};
pub use view::View;
