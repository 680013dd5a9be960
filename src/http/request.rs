//! Request handling and transformation.
//!
//! # Responsibilities
//! - Sanitize inbound headers for forwarding
//! - Choose the outbound body representation from the declared content type
//! - Re-encode multipart forms and re-serialize JSON
//!
//! # Design Decisions
//! - GET and HEAD never carry a body upstream
//! - Opaque bodies are streamed; only JSON, URL-encoded forms and multipart
//!   parts are held in memory, bounded by the configured ceiling
//! - Multipart drops the inbound `content-type` so the client can emit a
//!   fresh boundary matching the re-encoded body

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{FromRequest, Multipart},
    http::{header, HeaderMap, Method, Request},
};
use reqwest::multipart::{Form, Part};

use crate::http::content_type::BodyKind;
use crate::http::error::GatewayError;
use crate::security::headers::sanitize_request_headers;

/// Body to send upstream.
pub enum OutboundBody {
    /// No body at all.
    Empty,
    /// Fully materialized bytes (JSON, URL-encoded form).
    Buffered(Bytes),
    /// Re-encoded multipart form; the client sets the boundary.
    Multipart(Form),
    /// Inbound body passed through as it arrives.
    Stream(Body),
}

impl std::fmt::Debug for OutboundBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutboundBody::Empty => f.write_str("Empty"),
            OutboundBody::Buffered(bytes) => write!(f, "Buffered({} bytes)", bytes.len()),
            OutboundBody::Multipart(form) => write!(f, "Multipart(boundary={})", form.boundary()),
            OutboundBody::Stream(_) => f.write_str("Stream"),
        }
    }
}

/// Everything the upstream invoker needs for one call.
#[derive(Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: OutboundBody,
}

/// Turn an inbound request into the request sent to `url`.
///
/// `max_buffered` bounds bodies that must be read fully before forwarding.
pub async fn adapt_request(
    request: Request<Body>,
    url: String,
    max_buffered: usize,
) -> Result<OutboundRequest, GatewayError> {
    let method = request.method().clone();

    if method == Method::GET || method == Method::HEAD {
        let (parts, _) = request.into_parts();
        return Ok(OutboundRequest {
            method,
            url,
            headers: sanitize_request_headers(parts.headers),
            body: OutboundBody::Empty,
        });
    }

    let kind = BodyKind::from_headers(request.headers());
    tracing::trace!(method = %method, kind = kind.as_str(), "Adapting request body");

    let (headers, body) = match kind {
        BodyKind::Multipart => {
            let mut headers = sanitize_request_headers(request.headers().clone());
            headers.remove(header::CONTENT_TYPE);
            let form = reencode_multipart(request).await?;
            (headers, OutboundBody::Multipart(form))
        }
        BodyKind::Json => {
            let (parts, body) = request.into_parts();
            let bytes = read_body(body, max_buffered).await?;
            let value: serde_json::Value = serde_json::from_slice(&bytes)?;
            let canonical = serde_json::to_vec(&value)?;
            (
                sanitize_request_headers(parts.headers),
                OutboundBody::Buffered(Bytes::from(canonical)),
            )
        }
        BodyKind::FormUrlEncoded => {
            let (parts, body) = request.into_parts();
            let bytes = read_body(body, max_buffered).await?;
            (sanitize_request_headers(parts.headers), OutboundBody::Buffered(bytes))
        }
        BodyKind::Opaque => {
            let (parts, body) = request.into_parts();
            let body = if body.is_end_stream() {
                OutboundBody::Empty
            } else {
                OutboundBody::Stream(body)
            };
            (sanitize_request_headers(parts.headers), body)
        }
    };

    Ok(OutboundRequest {
        method,
        url,
        headers,
        body,
    })
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, GatewayError> {
    axum::body::to_bytes(body, limit)
        .await
        .map_err(GatewayError::BodyRead)
}

/// Decode an inbound multipart form and rebuild it part by part, keeping
/// field names, file names, part content types and bytes.
async fn reencode_multipart(request: Request<Body>) -> Result<Form, GatewayError> {
    let mut multipart = Multipart::from_request(request, &()).await?;
    let mut form = Form::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let data = field.bytes().await?;

        let len = data.len() as u64;
        let mut part = Part::stream_with_length(data, len);
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| GatewayError::InvalidPart {
                    field: name.clone(),
                    reason: e.to_string(),
                })?;
        }
        form = form.part(name, part);
    }

    Ok(form)
}
