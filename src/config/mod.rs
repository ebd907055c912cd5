//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PollerConfig (validated, immutable)
//!     → CLI flags override individual fields
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    BackoffConfig, DispatchConfig, DispatchMode, LimitsConfig, ObservabilityConfig, PollerConfig,
    ServerConfig, TransportConfig, ViewConfig,
};
pub use validation::{validate_config, ValidationError};
