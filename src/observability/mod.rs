//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway pipeline produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tower-http TraceLayer (per-request spans, x-request-id)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
