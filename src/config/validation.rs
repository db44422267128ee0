//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs
//! - Validate value ranges (limits > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Missing credentials are not validation errors; they fail each chat
//!   request instead, so a reload can supply them later

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not a valid http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("upstream.model must not be empty")]
    EmptyModel,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::Zero {
            field: "listener.max_body_bytes",
        });
    }

    check_url(&mut errors, "upstream.api_url", &config.upstream.api_url);
    if config.upstream.model.trim().is_empty() {
        errors.push(ValidationError::EmptyModel);
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "upstream.connect_timeout_secs",
        });
    }

    if let Some(url) = config.store.url.as_deref().filter(|u| !u.trim().is_empty()) {
        check_url(&mut errors, "store.url", url);
    }

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = url::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
