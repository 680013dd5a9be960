//! Backend Gateway Library
//!
//! A catch-all HTTP gateway that relays browser requests to a single
//! backend service under a mount prefix.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
