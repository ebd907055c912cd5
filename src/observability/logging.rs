//! Structured logging.
//!
//! Log lines go to stderr so stdout stays free for results and JSON
//! reports. `RUST_LOG` wins over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("render_poller={}", config.log_level)
}

/// Install the global tracing subscriber.
pub fn init(config: &ObservabilityConfig) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(config).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_targets_crate() {
        let mut config = ObservabilityConfig::default();
        config.log_level = "debug".into();
        assert_eq!(default_directive(&config), "render_poller=debug");
    }
}
