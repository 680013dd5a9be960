//! Upstream target resolution.
//!
//! # Responsibilities
//! - Strip the mount prefix from the inbound path
//! - Build `base + "/" + remaining path + query` for the upstream call
//!
//! # Design Decisions
//! - Plain concatenation: no `..` resolution, no percent decoding or
//!   re-encoding of the path
//! - Prefix matching is per path segment (`/proxy` does not claim `/proxyx`)
//! - An unset base is an explicit `None`, handled by the caller

use std::fmt;

/// The path prefix under which the gateway is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPrefix {
    prefix: String,
}

impl MountPrefix {
    /// Create a mount prefix. A trailing `/` is ignored; `""` or `"/"`
    /// mounts the gateway at the root.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Path patterns the HTTP router must register so that every request
    /// at or below the prefix reaches the gateway.
    pub fn route_patterns(&self) -> Vec<String> {
        if self.prefix.is_empty() {
            vec!["/".to_string(), "/{*path}".to_string()]
        } else {
            vec![
                self.prefix.clone(),
                format!("{}/", self.prefix),
                format!("{}/{{*path}}", self.prefix),
            ]
        }
    }

    /// The part of `path` after the prefix and its separating `/`, or
    /// `None` when the path is not under this prefix.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() {
            return Some(rest);
        }
        rest.strip_prefix('/')
    }
}

/// Configured base URL of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBase(String);

impl UpstreamBase {
    /// Returns `None` for an empty base, which callers must treat as
    /// "not configured".
    pub fn new(base: impl AsRef<str>) -> Option<Self> {
        let base = base.as_ref().trim().trim_end_matches('/');
        if base.is_empty() {
            None
        } else {
            Some(Self(base.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the upstream URL for a remaining path and raw query string
    /// (without the leading `?`).
    pub fn resolve(&self, remaining_path: &str, query: Option<&str>) -> String {
        let mut url = String::with_capacity(self.0.len() + remaining_path.len() + 2);
        url.push_str(&self.0);
        url.push('/');
        url.push_str(remaining_path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

impl fmt::Display for UpstreamBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the upstream URL for an inbound path and query.
///
/// Paths outside the mount prefix are forwarded whole, minus the leading
/// `/`; the router never sends such paths here.
pub fn resolve_target(
    base: &UpstreamBase,
    prefix: &MountPrefix,
    path: &str,
    query: Option<&str>,
) -> String {
    let remaining = prefix
        .strip(path)
        .unwrap_or_else(|| path.trim_start_matches('/'));
    base.resolve(remaining, query)
}
