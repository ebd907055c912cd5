//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the poller.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the render poller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PollerConfig {
    /// Render server location.
    pub server: ServerConfig,

    /// Status-check transport settings.
    pub transport: TransportConfig,

    /// Backoff growth and the cosmetic give-up notice.
    pub backoff: BackoffConfig,

    /// Terminal failure limits.
    pub limits: LimitsConfig,

    /// How status bodies are classified.
    pub dispatch: DispatchConfig,

    /// View variant settings.
    pub view: ViewConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Render server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL that `/is_ready/` and `/render/` are resolved against.
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081/".to_string(),
        }
    }
}

/// Transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-request timeout in seconds. Unset means no timeout.
    pub request_timeout_secs: Option<u64>,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: None,
            user_agent: concat!("render-poller/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Initial backoff in seconds.
    pub initial_secs: f64,

    /// Multiplier applied after every non-ready check.
    pub factor: f64,

    /// Random extra delay as a fraction of the delay (0.0 = none).
    pub jitter_ratio: f64,

    /// Backoff above which the "Giving up." notice is shown.
    /// Polling continues regardless.
    pub give_up_notice_secs: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_secs: 5.0,
            factor: 1.5,
            jitter_ratio: 0.0,
            give_up_notice_secs: 60.0,
        }
    }
}

/// Limits that end a polling sequence in failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum number of status checks.
    pub max_attempts: Option<u32>,

    /// Maximum total time spent polling, in seconds.
    pub max_elapsed_secs: Option<u64>,
}

/// Status body classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Every body other than `ok` is retried.
    #[default]
    Lenient,
    /// `fail` is retried; any other body alerts, then is retried.
    Strict,
}

/// Dispatch configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub mode: DispatchMode,
}

/// View configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Show the metadata panel once the image is revealed.
    pub show_metadata: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { show_metadata: true }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Prometheus endpoint bind address. Unset disables the exporter.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
