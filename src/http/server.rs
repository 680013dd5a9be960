//! HTTP server setup and the gateway handler.
//!
//! # Responsibilities
//! - Create Axum Router mounting the gateway under its prefix
//! - Wire up middleware (tracing, request ID, body limit)
//! - Run the per-request pipeline: resolve → adapt → invoke → adapt
//! - Convert every fatal error into the JSON error body at one boundary

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Method, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::error::{GatewayError, ProxyFailure};
use crate::http::request::adapt_request;
use crate::http::response::{adapt_response, status_text};
use crate::http::upstream::UpstreamClient;
use crate::observability::metrics;
use crate::routing::{resolve_target, MountPrefix, UpstreamBase};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub mount: MountPrefix,
    /// `None` when no backend is configured; every request then fails fast.
    pub upstream: Option<Arc<UpstreamBase>>,
    pub upstream_env_var: Arc<str>,
    pub client: UpstreamClient,
    pub max_buffered_body: usize,
}

impl AppState {
    pub fn new(
        mount: MountPrefix,
        upstream: Option<UpstreamBase>,
        upstream_env_var: impl Into<Arc<str>>,
        client: UpstreamClient,
        max_buffered_body: usize,
    ) -> Self {
        Self {
            mount,
            upstream: upstream.map(Arc::new),
            upstream_env_var: upstream_env_var.into(),
            client,
            max_buffered_body,
        }
    }

    /// Derive state from a validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = UpstreamClient::new(
            config
                .upstream
                .connect_timeout_secs
                .map(Duration::from_secs),
        )?;
        Ok(Self::new(
            MountPrefix::new(config.proxy.mount_prefix.as_str()),
            config.upstream.base_url().and_then(UpstreamBase::new),
            config.upstream.env_var.as_str(),
            client,
            config.limits.max_buffered_body_bytes,
        ))
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::from_config(config)?;

        match &state.upstream {
            Some(base) => tracing::info!(upstream = %base, mount = %state.mount.as_str(), "Gateway configured"),
            None => tracing::warn!(
                variable = %state.upstream_env_var,
                "Backend server not configured; every request will fail with 500"
            ),
        }

        Ok(Self {
            router: build_router(state),
        })
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_buffered_body;
    let mut router = Router::new();
    for pattern in state.mount.route_patterns() {
        router = router.route(&pattern, any(gateway_handler));
    }

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Logs and counts the exchange if the caller disconnects before the
/// upstream response head is in hand. The handler future is dropped in
/// that case, which drops the in-flight upstream call with it.
struct InFlight<'a> {
    request_id: &'a str,
    method: &'a Method,
    url: &'a str,
    done: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            tracing::debug!(
                request_id = %self.request_id,
                method = %self.method,
                url = %self.url,
                "Caller disconnected; upstream call abandoned"
            );
            metrics::record_cancelled(self.method);
        }
    }
}

/// Main gateway handler.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().clone();

    let Some(base) = state.upstream.as_deref() else {
        tracing::error!(
            request_id = %request_id,
            variable = %state.upstream_env_var,
            "Backend server not configured"
        );
        let error = GatewayError::NotConfigured {
            variable: state.upstream_env_var.to_string(),
        };
        metrics::record_request(&method, 500, error.kind(), start);
        return ProxyFailure::new(error, "", method).into_response();
    };

    let url = resolve_target(
        base,
        &state.mount,
        request.uri().path(),
        request.uri().query(),
    );

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        url = %url,
        "Proxying request"
    );

    let mut in_flight = InFlight {
        request_id: &request_id,
        method: &method,
        url: &url,
        done: false,
    };
    let result = forward(&state, request, url.clone()).await;
    in_flight.done = true;
    drop(in_flight);

    match result {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(
                request_id = %request_id,
                status = status.as_u16(),
                status_text = status_text(status),
                "Relaying upstream response"
            );
            metrics::record_request(&method, status.as_u16(), "relayed", start);
            response
        }
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                url = %url,
                kind = error.kind(),
                error = %error,
                "API proxy error"
            );
            metrics::record_request(&method, 500, error.kind(), start);
            ProxyFailure::new(error, url, method).into_response()
        }
    }
}

async fn forward(state: &AppState, request: Request<Body>, url: String) -> Result<Response, GatewayError> {
    let outbound = adapt_request(request, url, state.max_buffered_body).await?;
    let upstream = state.client.send(outbound).await?;
    adapt_response(upstream).await
}
