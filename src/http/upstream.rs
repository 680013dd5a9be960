//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Issue exactly one request per inbound exchange
//! - Stream pass-through bodies without buffering them
//! - Report transport failures as `GatewayError::Upstream`
//!
//! # Design Decisions
//! - No retries and no overall timeout; long uploads must not be cut off
//! - An optional connect timeout bounds only connection establishment
//! - System proxy settings are ignored; the backend is addressed directly
//! - Compressed responses are decoded here, which is why `content-encoding`
//!   never reaches the caller

use std::time::Duration;

use crate::http::error::GatewayError;
use crate::http::request::{OutboundBody, OutboundRequest};

/// Shared, cheaply cloneable client for the backend.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client. `connect_timeout` of `None` keeps the transport default.
    pub fn new(connect_timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Send the request and wait for the response head.
    ///
    /// Dropping the returned future aborts the upstream call.
    pub async fn send(&self, request: OutboundRequest) -> Result<reqwest::Response, GatewayError> {
        let OutboundRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let builder = self.client.request(method, url.as_str()).headers(headers);
        let builder = match body {
            OutboundBody::Empty => builder,
            OutboundBody::Buffered(bytes) => builder.body(bytes),
            OutboundBody::Multipart(form) => builder.multipart(form),
            OutboundBody::Stream(body) => {
                builder.body(reqwest::Body::wrap_stream(body.into_data_stream()))
            }
        };

        let response = builder.send().await?;
        tracing::debug!(
            url = %url,
            status = %response.status(),
            "Upstream responded"
        );
        Ok(response)
    }
}
