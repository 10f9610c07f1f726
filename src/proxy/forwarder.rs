//! Request forwarding to backend services.
//!
//! # Responsibilities
//! - Build the outbound URL from the matched route
//! - Rebuild the request with the same method, headers and body stream
//! - Issue it through the shared pooled client
//! - Hand back status, content type and the still-unread response body
//!
//! # Design Decisions
//! - Neither body is ever collected; frames flow through as they arrive
//! - The upstream deadline covers the wait for response headers only
//! - Dropping the returned body releases the upstream connection

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode, Uri},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{ForwardingConfig, TimeoutConfig};
use crate::error::{GatewayError, GatewayResult};
use crate::proxy::headers::prepare_headers;
use crate::resilience::timeouts::{self, with_deadline};
use crate::routing::RouteEntry;

/// A backend response whose body has not been read yet.
#[derive(Debug)]
pub struct ForwardResult {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Incoming,
}

/// Forwards requests to backends over a shared connection pool.
#[derive(Debug, Clone)]
pub struct ProxyForwarder {
    client: Client<HttpConnector, Body>,
    deadline: Option<Duration>,
    forwarding: ForwardingConfig,
}

impl ProxyForwarder {
    pub fn new(timeouts: &TimeoutConfig, forwarding: &ForwardingConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(timeouts::from_secs(timeouts.connect_secs));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            deadline: timeouts::from_secs(timeouts.upstream_secs),
            forwarding: forwarding.clone(),
        }
    }

    /// Send `request` to `target_url` and return the backend's response head.
    pub async fn forward(
        &self,
        request: Request<Body>,
        target_url: &str,
    ) -> GatewayResult<ForwardResult> {
        let outbound = self.build_request(request, target_url)?;

        let response = with_deadline(self.deadline, self.client.request(outbound))
            .await
            .map_err(|elapsed| GatewayError::BackendUnreachable {
                target: target_url.to_string(),
                reason: elapsed.to_string(),
            })?
            .map_err(|e| GatewayError::BackendUnreachable {
                target: target_url.to_string(),
                reason: e.to_string(),
            })?;

        let (parts, body) = response.into_parts();
        Ok(ForwardResult {
            status: parts.status,
            content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
            body,
        })
    }

    fn build_request(&self, request: Request<Body>, target_url: &str) -> GatewayResult<Request<Body>> {
        let malformed = |reason: String| GatewayError::OutboundRequestMalformed {
            target: target_url.to_string(),
            reason,
        };

        let uri: Uri = target_url.parse().map_err(|e: axum::http::uri::InvalidUri| malformed(e.to_string()))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(malformed("target URL is not absolute".to_string()));
        }

        let (parts, body) = request.into_parts();
        let mut outbound = Request::builder()
            .method(parts.method)
            .uri(uri)
            .body(body)
            .map_err(|e| malformed(e.to_string()))?;

        *outbound.headers_mut() = parts.headers;
        prepare_headers(outbound.headers_mut(), &self.forwarding);

        Ok(outbound)
    }
}

/// `target_base_url + service_path + remainder [+ "?" + query]`.
pub fn outbound_url(entry: &RouteEntry, remainder: &str, query: Option<&str>) -> String {
    let mut url = String::with_capacity(
        entry.target_base_url.len()
            + entry.service_path.len()
            + remainder.len()
            + query.map_or(0, |q| q.len() + 1),
    );
    url.push_str(&entry.target_base_url);
    url.push_str(&entry.service_path);
    url.push_str(remainder);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}
