//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (max-age >= 0, timeouts > 0, bind address parses)
//! - Warn about preload-list requirements that are not met (separately,
//!   once logging is up)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, HstsSettings, ONE_YEAR_SECS};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("hsts.max_age must not be negative (got {0})")]
    NegativeMaxAge(i64),

    #[error("listener.bind_address is not a socket address: {0}")]
    InvalidBindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.log_level is unknown: {0}")]
    UnknownLogLevel(String),
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.hsts.max_age < 0 {
        errors.push(ValidationError::NegativeMaxAge(config.hsts.max_age));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Browsers only accept preload submissions with a max-age of at least one
/// year and includeSubDomains set. The header is still valid without them.
///
/// Call after logging is initialized; nothing is reported otherwise.
pub fn warn_preload_requirements(settings: &HstsSettings) {
    if !settings.send_preload_directive {
        return;
    }
    if settings.max_age < ONE_YEAR_SECS {
        tracing::warn!(
            max_age = settings.max_age,
            required = ONE_YEAR_SECS,
            "preload directive sent with a max-age below the preload-list minimum"
        );
    }
    if !settings.include_subdomains {
        tracing::warn!("preload directive sent without includeSubDomains");
    }
}
