//! Gateway failures and the JSON bodies callers see for them.
//!
//! # Design Decisions
//! - Every gateway-layer failure is answered with 500; backend failures are
//!   relayed verbatim and never pass through here
//! - The body carries only the top-level message, never the source chain

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// `error` value of the configuration-error body.
pub const NOT_CONFIGURED_ERROR: &str = "Backend server not configured";

/// `error` value of every other gateway error body.
pub const PROXY_ERROR: &str = "API proxy error";

/// Fatal, per-request gateway failures.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No upstream base URL; raised before any network I/O.
    #[error("{variable} environment variable is not set")]
    NotConfigured { variable: String },

    /// The inbound body could not be read (disconnect, size ceiling).
    #[error("Failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    /// The inbound request is not a decodable multipart form.
    #[error("Failed to parse multipart form: {0}")]
    MultipartRejected(#[from] MultipartRejection),

    /// A multipart field could not be decoded.
    #[error("Failed to parse multipart form: {0}")]
    Multipart(#[from] MultipartError),

    /// A multipart field could not be re-encoded for the upstream.
    #[error("Invalid multipart field '{field}': {reason}")]
    InvalidPart { field: String, reason: String },

    /// The inbound body declared JSON but did not parse.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection, DNS, TLS or protocol failure talking to the backend.
    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl GatewayError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::NotConfigured { .. } => "not_configured",
            GatewayError::BodyRead(_) => "body_read",
            GatewayError::MultipartRejected(_)
            | GatewayError::Multipart(_)
            | GatewayError::InvalidPart { .. } => "multipart",
            GatewayError::Json(_) => "json",
            GatewayError::Upstream(_) => "upstream",
        }
    }
}

/// Body returned when no upstream base URL is configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigErrorBody {
    pub error: String,
    pub details: String,
    pub timestamp: String,
}

/// Body returned for every other gateway failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyErrorBody {
    pub error: String,
    pub details: String,
    pub timestamp: String,
    pub url: String,
    pub method: String,
}

/// A failure together with the request context reported to the caller.
#[derive(Debug)]
pub struct ProxyFailure {
    pub error: GatewayError,
    pub url: String,
    pub method: Method,
}

impl ProxyFailure {
    pub fn new(error: GatewayError, url: impl Into<String>, method: Method) -> Self {
        Self {
            error,
            url: url.into(),
            method,
        }
    }
}

/// ISO-8601 UTC timestamp with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        let details = self.error.to_string();
        match self.error {
            GatewayError::NotConfigured { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConfigErrorBody {
                    error: NOT_CONFIGURED_ERROR.to_string(),
                    details,
                    timestamp: timestamp(),
                }),
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ProxyErrorBody {
                    error: PROXY_ERROR.to_string(),
                    details,
                    timestamp: timestamp(),
                    url: self.url,
                    method: self.method.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
