//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (path, query)
//!     → target.rs (strip mount prefix)
//!     → target.rs (append remainder + query to the upstream base)
//!     → Return: fully-qualified upstream URL
//! ```
//!
//! # Design Decisions
//! - One upstream, one mount prefix; no route table
//! - Prefix and base are fixed at startup, immutable at runtime
//! - Deterministic: same input always yields the same URL

pub mod target;

pub use target::{resolve_target, MountPrefix, UpstreamBase};
