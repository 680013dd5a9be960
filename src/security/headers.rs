//! Header sanitization.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions, including any named by
//!   `Connection`
//! - Strip proxy-hop headers (`host`, `x-forwarded-*`) before forwarding
//! - Strip framing headers the transport must recompute
//! - Let the transport negotiate compression; it decodes only what it offers
//!
//! # Design Decisions
//! - Sanitization is a declarative remove-list applied to a `HeaderMap`
//!   (case-insensitive multi-map), independent of transport
//! - Everything not on a list is preserved, repeated values included

use axum::http::{header::CONNECTION, HeaderMap, HeaderName};

/// Connection-scoped headers (RFC 9110 §7.6.1).
pub const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Removed from the inbound request before it is sent upstream.
pub const REQUEST_STRIPPED_HEADERS: &[&str] = &[
    "host",
    "x-forwarded-host",
    "x-forwarded-for",
    "x-forwarded-proto",
    "content-length",
    "accept-encoding",
];

/// Removed from the upstream response before it is relayed.
pub const RESPONSE_STRIPPED_HEADERS: &[&str] = &["content-encoding", "content-length"];

/// Remove every header named in `names`, all values included.
pub fn strip_headers(headers: &mut HeaderMap, names: &[&str]) {
    for name in names {
        headers.remove(*name);
    }
}

/// Remove the headers listed as tokens in `Connection`.
pub fn strip_connection_tokens(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();
    for name in named {
        headers.remove(name);
    }
}

/// Headers to send upstream for an inbound header set.
pub fn sanitize_request_headers(mut headers: HeaderMap) -> HeaderMap {
    strip_connection_tokens(&mut headers);
    strip_headers(&mut headers, HOP_BY_HOP_HEADERS);
    strip_headers(&mut headers, REQUEST_STRIPPED_HEADERS);
    headers
}

/// Headers to relay to the caller for an upstream header set.
pub fn sanitize_response_headers(mut headers: HeaderMap) -> HeaderMap {
    strip_connection_tokens(&mut headers);
    strip_headers(&mut headers, HOP_BY_HOP_HEADERS);
    strip_headers(&mut headers, RESPONSE_STRIPPED_HEADERS);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    #[test]
    fn test_request_headers_stripped() {
        let inbound = headers(&[
            ("Host", "gateway.local"),
            ("Content-Length", "42"),
            ("X-Forwarded-Host", "example.com"),
            ("X-Forwarded-For", "10.0.0.1"),
            ("X-Forwarded-Proto", "https"),
            ("Connection", "keep-alive"),
            ("Accept-Encoding", "gzip, deflate, br, zstd"),
            ("Authorization", "Bearer t"),
            ("Content-Type", "application/json"),
            ("X-Library-Id", "lib-1"),
        ]);

        let outbound = sanitize_request_headers(inbound);

        for name in ["host", "content-length", "x-forwarded-host", "x-forwarded-for", "x-forwarded-proto", "connection", "accept-encoding"] {
            assert!(!outbound.contains_key(name), "{name} should be stripped");
        }
        assert_eq!(outbound["authorization"], "Bearer t");
        assert_eq!(outbound["content-type"], "application/json");
        assert_eq!(outbound["x-library-id"], "lib-1");
        assert_eq!(outbound.len(), 3);
    }

    #[test]
    fn test_repeated_values_preserved_in_order() {
        let inbound = headers(&[
            ("Accept", "text/html"),
            ("X-Forwarded-For", "1.1.1.1"),
            ("Accept", "application/json"),
            ("X-Forwarded-For", "2.2.2.2"),
        ]);

        let outbound = sanitize_request_headers(inbound);

        let accepts: Vec<_> = outbound.get_all("accept").iter().collect();
        assert_eq!(accepts, vec!["text/html", "application/json"]);
        assert!(outbound.get_all("x-forwarded-for").iter().next().is_none());
    }

    #[test]
    fn test_connection_named_headers_stripped() {
        let inbound = headers(&[
            ("Connection", "close, X-Session-Hop"),
            ("Connection", "Keep-Alive"),
            ("X-Session-Hop", "1"),
            ("Keep-Alive", "timeout=5"),
            ("X-Library-Id", "lib-1"),
        ]);

        let outbound = sanitize_request_headers(inbound);
        assert!(!outbound.contains_key("x-session-hop"));
        assert!(!outbound.contains_key("keep-alive"));
        assert!(!outbound.contains_key("connection"));
        assert_eq!(outbound["x-library-id"], "lib-1");

        let upstream = headers(&[
            ("Connection", "x-backend-hop"),
            ("X-Backend-Hop", "a"),
            ("Content-Type", "text/plain"),
        ]);
        let relayed = sanitize_response_headers(upstream);
        assert!(!relayed.contains_key("x-backend-hop"));
        assert_eq!(relayed["content-type"], "text/plain");
    }

    #[test]
    fn test_response_headers_stripped() {
        let upstream = headers(&[
            ("Content-Encoding", "gzip"),
            ("Content-Length", "10"),
            ("Transfer-Encoding", "chunked"),
            ("Content-Type", "application/octet-stream"),
            ("Set-Cookie", "a=1"),
            ("Set-Cookie", "b=2"),
        ]);

        let outbound = sanitize_response_headers(upstream);

        assert!(!outbound.contains_key("content-encoding"));
        assert!(!outbound.contains_key("content-length"));
        assert!(!outbound.contains_key("transfer-encoding"));
        assert_eq!(outbound["content-type"], "application/octet-stream");
        assert_eq!(outbound.get_all("set-cookie").iter().count(), 2);
    }
}
