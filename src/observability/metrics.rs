//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, outcome
//! - `gateway_request_duration_seconds` (histogram): time to response head
//! - `gateway_requests_cancelled_total` (counter): callers that went away
//!   before the upstream answered
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus exposition only when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one finished exchange. `outcome` is `"relayed"` or an error kind.
pub fn record_request(method: &Method, status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a caller disconnect while the upstream call was in flight.
pub fn record_cancelled(method: &Method) {
    metrics::counter!(
        "gateway_requests_cancelled_total",
        "method" => method.to_string()
    )
    .increment(1);
}
