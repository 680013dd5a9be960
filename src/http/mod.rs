//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → server.rs (Axum setup, request ID, tracing)
//!     → routing::target (resolve upstream URL)
//!     → request.rs (sanitize headers, adapt body by content_type.rs)
//!     → upstream.rs (one call to the backend)
//!     → response.rs (sanitize headers, adapt body)
//!     → Send to caller
//!
//! Any fatal error on the way → error.rs (500 + JSON body)
//! ```

pub mod content_type;
pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod upstream;

pub use content_type::BodyKind;
pub use error::{GatewayError, ProxyFailure};
pub use server::{build_router, AppState, HttpServer};
pub use upstream::UpstreamClient;
