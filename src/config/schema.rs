//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Environment variable consulted for the upstream base URL.
pub const DEFAULT_UPSTREAM_ENV_VAR: &str = "API_SERVER_URL";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where the gateway is mounted on the inbound side.
    pub proxy: MountConfig,

    /// Backend the gateway forwards to.
    pub upstream: UpstreamConfig,

    /// Memory ceilings for materialized bodies.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Inbound mount configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MountConfig {
    /// Path prefix under which everything is forwarded (e.g., "/proxy").
    /// Empty mounts the gateway at the root.
    pub mount_prefix: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            mount_prefix: "/proxy".to_string(),
        }
    }
}

/// Upstream backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the backend (e.g., "http://127.0.0.1:8000").
    /// Unset or empty means every request fails with a configuration error.
    pub base_url: Option<String>,

    /// Name of the environment variable that supplies `base_url`.
    /// Reported back to callers when the URL is missing.
    pub env_var: String,

    /// Connection establishment timeout in seconds. No overall request
    /// timeout is applied; uploads and generations can run long.
    pub connect_timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            env_var: DEFAULT_UPSTREAM_ENV_VAR.to_string(),
            connect_timeout_secs: None,
        }
    }
}

impl UpstreamConfig {
    /// The configured base URL, treating an empty string as unset.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Limits on bodies the gateway has to hold in memory.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Ceiling for JSON, URL-encoded and multipart bodies, which are
    /// materialized before forwarding. Opaque bodies are streamed.
    pub max_buffered_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_buffered_body_bytes: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
