//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the backend status (and a non-canonical reason phrase) unchanged
//! - Strip hop-by-hop and framing headers the transport recomputes
//! - Re-serialize JSON bodies; stream everything else
//!
//! # Design Decisions
//! - Upstream JSON that does not parse is relayed as-is, never turned into
//!   a gateway error
//! - Non-JSON bodies are streamed to avoid buffering large downloads

use axum::{
    body::{Body, Bytes},
    http::StatusCode,
    response::Response,
};
use hyper::ext::ReasonPhrase;

use crate::http::content_type::BodyKind;
use crate::http::error::GatewayError;
use crate::security::headers::sanitize_response_headers;

/// Build the caller-facing response from an upstream response.
///
/// Fails only if a JSON body cannot be read off the wire.
pub async fn adapt_response(upstream: reqwest::Response) -> Result<Response, GatewayError> {
    let status = upstream.status();
    let reason = upstream.extensions().get::<ReasonPhrase>().cloned();
    let kind = BodyKind::from_headers(upstream.headers());
    let headers = sanitize_response_headers(upstream.headers().clone());

    let body = match kind {
        BodyKind::Json => {
            let raw = upstream.bytes().await?;
            Body::from(reserialize_json(raw))
        }
        BodyKind::Multipart | BodyKind::FormUrlEncoded | BodyKind::Opaque => {
            Body::from_stream(upstream.bytes_stream())
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    Ok(response)
}

/// Parse and re-serialize a JSON body, or hand back the original bytes if
/// they are not valid JSON.
fn reserialize_json(raw: Bytes) -> Bytes {
    if raw.is_empty() {
        return raw;
    }
    match serde_json::from_slice::<serde_json::Value>(&raw) {
        Ok(value) => match serde_json::to_vec(&value) {
            Ok(serialized) => Bytes::from(serialized),
            Err(_) => raw,
        },
        Err(e) => {
            tracing::warn!(error = %e, len = raw.len(), "Upstream declared JSON but sent invalid JSON; relaying raw body");
            raw
        }
    }
}

/// Canonical reason phrase for a status, used when logging.
pub fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}
