//! Backend Gateway
//!
//! Relays every request under a mount prefix to one backend service.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                       GATEWAY                        │
//!   Browser request   │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐  │
//!   ──────────────────┼─▶│  server  │──▶│ routing  │──▶│ request adapter  │  │
//!                     │  │ (axum)   │   │ (target) │   │ headers + body   │  │
//!                     │  └──────────┘   └──────────┘   └────────┬─────────┘  │
//!                     │                                         ▼            │
//!   Browser response  │  ┌──────────────────┐          ┌──────────────────┐  │
//!   ◀─────────────────┼──│ response adapter │◀─────────│ upstream client  │◀─┼── Backend
//!                     │  │ headers + body   │          │    (reqwest)     │  │
//!                     │  └──────────────────┘          └──────────────────┘  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use backend_gateway::config::{read_config, validation::validate_config, GatewayConfig};
use backend_gateway::http::HttpServer;
use backend_gateway::lifecycle::{signals, Shutdown};
use backend_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "backend-gateway")]
#[command(about = "Catch-all HTTP gateway to a backend API", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080.
    #[arg(short, long)]
    bind: Option<String>,

    /// Path prefix forwarded to the backend, e.g. /proxy.
    #[arg(long)]
    mount_prefix: Option<String>,

    /// Backend base URL.
    #[arg(long, env = "API_SERVER_URL")]
    upstream_url: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => GatewayConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(prefix) = self.mount_prefix {
            config.proxy.mount_prefix = prefix;
        }
        if let Some(url) = self.upstream_url {
            config.upstream.base_url = Some(url);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);
    tracing::info!("backend-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!(%error, "Invalid configuration");
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_prefix = %config.proxy.mount_prefix,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(&config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
