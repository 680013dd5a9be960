//! Content-type categories that drive body handling.

use axum::http::{header, HeaderMap};

/// Body representation chosen from a `content-type` header.
///
/// Matching is a case-insensitive substring test, checked in declaration
/// order. Anything unrecognized, including a missing header, is `Opaque`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Multipart,
    Json,
    FormUrlEncoded,
    Opaque,
}

impl BodyKind {
    const MARKERS: [(&'static str, BodyKind); 3] = [
        ("multipart/form-data", BodyKind::Multipart),
        ("application/json", BodyKind::Json),
        ("application/x-www-form-urlencoded", BodyKind::FormUrlEncoded),
    ];

    /// Classify a raw content-type value.
    pub fn from_content_type(content_type: &str) -> Self {
        let lowered = content_type.to_ascii_lowercase();
        Self::MARKERS
            .iter()
            .find(|(marker, _)| lowered.contains(marker))
            .map(|(_, kind)| *kind)
            .unwrap_or(BodyKind::Opaque)
    }

    /// Classify the `content-type` header of a message.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_content_type)
            .unwrap_or(BodyKind::Opaque)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Multipart => "multipart",
            BodyKind::Json => "json",
            BodyKind::FormUrlEncoded => "form",
            BodyKind::Opaque => "opaque",
        }
    }
}
