//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and URLs before the server binds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - A missing upstream URL is not an error here; the gateway still starts
//!   and answers every request with a configuration error

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a loaded configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let prefix = &config.proxy.mount_prefix;
    if !prefix.is_empty() && !prefix.starts_with('/') {
        errors.push(ValidationError::new(
            "proxy.mount_prefix",
            format!("'{prefix}' must start with '/'"),
        ));
    }

    if let Some(base) = config.upstream.base_url() {
        match url::Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "upstream.base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "upstream.base_url",
                format!("'{base}' is not a valid URL: {e}"),
            )),
        }
    }

    if config.limits.max_buffered_body_bytes == 0 {
        errors.push(ValidationError::new(
            "limits.max_buffered_body_bytes",
            "must be greater than zero",
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
