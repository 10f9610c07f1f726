//! Shared utilities for gateway integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use api_gateway::config::{GatewayConfig, RouteConfig};
use api_gateway::{HttpServer, Shutdown};
use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Canned response served by a [`RecordingBackend`].
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub extra_header: Option<(&'static str, &'static str)>,
    pub body: Bytes,
}

impl Canned {
    pub fn json(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some("application/json"),
            extra_header: None,
            body: Bytes::from_static(body.as_bytes()),
        }
    }
}

/// Backend that records every request and answers with a fixed response.
#[derive(Clone)]
pub struct RecordingBackend {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl RecordingBackend {
    pub async fn start(canned: Canned) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = (captured.clone(), canned);
        let router = Router::new().fallback(record).with_state(state);
        let addr = serve(router).await;
        Self { addr, captured }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    pub fn last(&self) -> Captured {
        self.captured
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("backend was never called")
    }
}

async fn record(
    State((captured, canned)): State<(Arc<Mutex<Vec<Captured>>>, Canned)>,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    captured.lock().unwrap().push(Captured {
        method: parts.method,
        path_and_query: parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default(),
        headers: parts.headers,
        body,
    });

    let mut response = Response::builder().status(canned.status);
    if let Some(content_type) = canned.content_type {
        response = response.header("content-type", content_type);
    }
    if let Some((name, value)) = canned.extra_header {
        response = response.header(name, value);
    }
    response.body(Body::from(canned.body)).unwrap()
}

/// Auth service accepting exactly one token on `GET /validate?token=`.
#[derive(Clone)]
pub struct MockAuth {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    tokens: Arc<Mutex<Vec<String>>>,
}

impl MockAuth {
    pub async fn start(valid_token: &'static str) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let tokens = Arc::new(Mutex::new(Vec::new()));
        let state = (calls.clone(), tokens.clone(), valid_token);
        let router = Router::new()
            .route("/validate", get(validate))
            .with_state(state);
        let addr = serve(router).await;
        Self { addr, calls, tokens }
    }

    pub fn validate_url(&self) -> String {
        format!("http://{}/validate", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

async fn validate(
    State((calls, tokens, valid)): State<(Arc<AtomicUsize>, Arc<Mutex<Vec<String>>>, &'static str)>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    calls.fetch_add(1, Ordering::SeqCst);
    let token = params.get("token").cloned().unwrap_or_default();
    tokens.lock().unwrap().push(token.clone());
    if token == valid {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::UNAUTHORIZED, "invalid token")
    }
}

/// Gateway config with no routes and the given auth endpoint.
pub fn config_with_auth(validate_url: String) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.auth.validate_url = validate_url;
    config.routes.clear();
    config
}

pub fn route(prefix: &str, target: String, requires_auth: bool) -> RouteConfig {
    RouteConfig::new(prefix, target, requires_auth)
}

/// A running gateway.
pub struct Gateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Gateway {
    pub async fn start(config: GatewayConfig) -> Self {
        let server = HttpServer::new(config).expect("valid gateway config");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, rx).await;
        });
        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
