//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound headers
//!     → headers.rs (drop hop-by-hop, host, x-forwarded-*, content-length)
//!     → Upstream request
//!
//! Upstream response headers
//!     → headers.rs (drop hop-by-hop, content-encoding, content-length)
//!     → Caller
//! ```
//!
//! # Design Decisions
//! - No authentication or rate limiting; the gateway is a relay
//! - Header policy lives in one place and is shared by both directions

pub mod headers;
