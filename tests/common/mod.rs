//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart};
use axum::http::{HeaderMap, Method, Request, Uri};
use axum::response::Response;
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use backend_gateway::config::GatewayConfig;
use backend_gateway::http::HttpServer;
use backend_gateway::lifecycle::Shutdown;

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// One decoded multipart field.
#[derive(Debug, Clone)]
pub struct RecordedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn path_and_query(&self) -> String {
        self.uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default()
    }

    /// Decode the recorded body as a multipart form.
    pub async fn multipart_fields(&self) -> Vec<RecordedField> {
        let mut builder = Request::builder().method(Method::POST).uri("/");
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        let request = builder.body(Body::from(self.body.clone())).unwrap();
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();

        let mut fields = Vec::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            fields.push(RecordedField {
                name: field.name().unwrap_or_default().to_string(),
                file_name: field.file_name().map(str::to_owned),
                content_type: field.content_type().map(str::to_owned),
                data: field.bytes().await.unwrap(),
            });
        }
        fields
    }
}

/// Every request a mock backend received, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    pub fn all(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn last(&self) -> Recorded {
        self.all().pop().expect("backend received no request")
    }
}

/// Start an axum backend that records every request and answers with
/// whatever `respond` builds from it.
pub async fn start_backend<F>(respond: F) -> (SocketAddr, Recorder)
where
    F: Fn(&Recorded) -> Response + Clone + Send + Sync + 'static,
{
    let recorder = Recorder::default();
    let sink = recorder.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let respond = respond.clone();
        let sink = sink.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
            let recorded = Recorded {
                method: parts.method,
                uri: parts.uri,
                headers: parts.headers,
                body,
            };
            let response = respond(&recorded);
            sink.0.lock().unwrap().push(recorded);
            response
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, recorder)
}

/// Start a backend that writes `raw` verbatim as its response to every
/// connection, after reading the request head.
pub async fn start_raw_backend(raw: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let _ = socket.write_all(raw).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

/// Start a backend that accepts one request and never answers. The
/// receiver fires once the gateway closes that connection.
pub async fn start_hanging_backend() -> (SocketAddr, oneshot::Receiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            read_request_head(&mut socket).await;
            let mut buf = [0u8; 1024];
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
            let _ = closed_tx.send(());
        }
    });
    (addr, closed_rx)
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running gateway under test.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Gateway mounted at `/proxy`, forwarding to `upstream`.
pub async fn start_gateway(upstream: Option<String>) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.upstream.base_url = upstream;
    start_gateway_with(config).await
}

pub async fn start_gateway_with(mut config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}

/// Client for calling the gateway.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
