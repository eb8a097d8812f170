//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! reported, not just the first one.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("backend.origin {origin:?} is not a valid URL: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("backend.origin {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("backend.origin {0:?} must not carry a query or fragment")]
    OriginHasQuery(String),

    #[error("relay.mount_prefix {0:?} must start with '/', must not end with '/' and must not be '/'")]
    InvalidMountPrefix(String),

    #[error("relay.mount_prefix {0:?} must be a literal path (no '{{', '}}', '*' or ':'-led segments)")]
    MountPrefixHasPattern(String),

    #[error("relay.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("listener.max_concurrent_requests must be greater than zero")]
    ZeroConcurrency,

    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.tls requires both cert_path and key_path")]
    IncompleteTls,
}

/// Validate a configuration, returning all problems found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_origin(&config.backend.origin, &mut errors);

    let prefix = &config.relay.mount_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        errors.push(ValidationError::InvalidMountPrefix(prefix.clone()));
    }
    if has_route_syntax(prefix) {
        errors.push(ValidationError::MountPrefixHasPattern(prefix.clone()));
    }

    if config.relay.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.listener.max_concurrent_requests == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() || tls.key_path.is_empty() {
            errors.push(ValidationError::IncompleteTls);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_origin(origin: &str, errors: &mut Vec<ValidationError>) {
    let url = match Url::parse(origin) {
        Ok(url) => url,
        Err(e) => {
            errors.push(ValidationError::InvalidOrigin {
                origin: origin.to_string(),
                reason: e.to_string(),
            });
            return;
        }
    };

    if !matches!(url.scheme(), "http" | "https") {
        errors.push(ValidationError::UnsupportedScheme(origin.to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        errors.push(ValidationError::OriginHasQuery(origin.to_string()));
    }
}

/// The prefix is spliced into an axum route, where these are captures or wildcards.
fn has_route_syntax(prefix: &str) -> bool {
    prefix.contains(['{', '}', '*']) || prefix.split('/').any(|segment| segment.starts_with(':'))
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
