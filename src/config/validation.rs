//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Check that configured header values are legal on the wire
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::RelayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.connect_secs ({connect}) exceeds timeouts.request_secs ({request})")]
    ConnectExceedsRequest { connect: u64, request: u64 },

    #[error("upstream.{0} is not a valid header value")]
    HeaderValue(&'static str),

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let timeouts = &config.timeouts;
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if timeouts.connect_secs > timeouts.request_secs && timeouts.request_secs > 0 {
        errors.push(ValidationError::ConnectExceedsRequest {
            connect: timeouts.connect_secs,
            request: timeouts.request_secs,
        });
    }

    let upstream = &config.upstream;
    if HeaderValue::from_str(&upstream.default_accept).is_err() {
        errors.push(ValidationError::HeaderValue("default_accept"));
    }
    if HeaderValue::from_str(&upstream.default_accept_language).is_err() {
        errors.push(ValidationError::HeaderValue("default_accept_language"));
    }
    if let Some(agent) = &upstream.user_agent {
        if HeaderValue::from_str(agent).is_err() {
            errors.push(ValidationError::HeaderValue("user_agent"));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.upstream.user_agent = Some("bad\nagent".into());
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BindAddress("not-an-address".into()),
                ValidationError::ZeroTimeout("request_secs"),
                ValidationError::HeaderValue("user_agent"),
                ValidationError::LogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn connect_timeout_cannot_exceed_request_timeout() {
        let mut config = RelayConfig::default();
        config.timeouts.connect_secs = 60;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ConnectExceedsRequest { connect: 60, request: 30 }]
        );
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = RelayConfig::default();
        config.observability.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
