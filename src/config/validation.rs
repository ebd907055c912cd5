//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URLs.
//! Every problem is reported, not just the first.

use thiserror::Error;
use url::Url;

use crate::config::schema::PollerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("server.base_url '{url}' is invalid: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("backoff.initial_secs must be a positive number, got {0}")]
    InitialBackoff(f64),

    #[error("backoff.factor must be at least 1.0, got {0}")]
    Factor(f64),

    #[error("backoff.jitter_ratio must be within 0.0..=1.0, got {0}")]
    JitterRatio(f64),

    #[error("backoff.give_up_notice_secs must not be negative, got {0}")]
    NoticeThreshold(f64),

    #[error("limits.max_attempts must be greater than zero")]
    MaxAttempts,

    #[error("limits.max_elapsed_secs must be greater than zero")]
    MaxElapsed,

    #[error("transport.request_timeout_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &PollerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(reason) = check_base_url(&config.server.base_url) {
        errors.push(ValidationError::BaseUrl {
            url: config.server.base_url.clone(),
            reason,
        });
    }

    let backoff = &config.backoff;
    if !(backoff.initial_secs.is_finite() && backoff.initial_secs > 0.0) {
        errors.push(ValidationError::InitialBackoff(backoff.initial_secs));
    }
    if !(backoff.factor.is_finite() && backoff.factor >= 1.0) {
        errors.push(ValidationError::Factor(backoff.factor));
    }
    if !(0.0..=1.0).contains(&backoff.jitter_ratio) {
        errors.push(ValidationError::JitterRatio(backoff.jitter_ratio));
    }
    if backoff.give_up_notice_secs.is_nan() || backoff.give_up_notice_secs < 0.0 {
        errors.push(ValidationError::NoticeThreshold(backoff.give_up_notice_secs));
    }

    if config.limits.max_attempts == Some(0) {
        errors.push(ValidationError::MaxAttempts);
    }
    if config.limits.max_elapsed_secs == Some(0) {
        errors.push(ValidationError::MaxElapsed);
    }
    if config.transport.request_timeout_secs == Some(0) {
        errors.push(ValidationError::RequestTimeout);
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot be a base".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&PollerConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = PollerConfig::default();
        config.server.base_url = "ftp://example.com/".into();
        config.backoff.initial_secs = 0.0;
        config.backoff.factor = 0.5;
        config.limits.max_attempts = Some(0);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::BaseUrl { .. }));
        assert_eq!(errors[1], ValidationError::InitialBackoff(0.0));
        assert_eq!(errors[2], ValidationError::Factor(0.5));
        assert_eq!(errors[3], ValidationError::MaxAttempts);
    }

    #[test]
    fn test_rejects_bad_metrics_address() {
        let mut config = PollerConfig::default();
        config.observability.metrics_address = Some("not-an-address".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MetricsAddress("not-an-address".into())]);
    }
}
