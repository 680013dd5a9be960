//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI flags / API_SERVER_URL override fields
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → upstream base handed to the gateway as an explicit Option
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the process never reloads it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::{LimitsConfig, ListenerConfig, LogFormat, MountConfig, ObservabilityConfig, UpstreamConfig};
