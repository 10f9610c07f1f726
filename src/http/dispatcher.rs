//! Per-request orchestration.
//!
//! ```text
//! Received → Routed → Unauthorized (401)
//!                   → Forwarding → Responded
//!                                → ForwardFailed (500)
//! Received → NoRoute (404)
//! ```
//!
//! No transition is retried.

use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};

use crate::auth::AuthGate;
use crate::error::{GatewayError, GatewayResult};
use crate::http::request::request_id;
use crate::http::response::relay;
use crate::proxy::{outbound_url, ProxyForwarder};
use crate::routing::RouteTable;

/// Routes, gates and forwards requests.
///
/// Holds only shared, immutable or internally synchronized parts, so one
/// instance serves every concurrent request.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    auth: AuthGate,
    forwarder: ProxyForwarder,
}

impl Dispatcher {
    pub fn new(routes: Arc<RouteTable>, auth: AuthGate, forwarder: ProxyForwarder) -> Self {
        Self {
            routes,
            auth,
            forwarder,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Handle one request end to end. Errors become JSON envelopes.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        match self.try_dispatch(request).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }

    async fn try_dispatch(&self, request: Request<Body>) -> GatewayResult<Response> {
        let request_id = request_id(request.headers()).to_string();
        let method = request.method().clone();

        let route = self.routes.resolve(request.uri().path()).ok_or_else(|| {
            let path = request.uri().path().to_string();
            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            GatewayError::RouteNotFound { path }
        })?;
        let entry = route.entry;
        let target_url = outbound_url(entry, route.remainder, request.uri().query());

        if entry.requires_auth {
            let decision = self.auth.authorize(request.headers()).await;
            if !decision.is_allowed() {
                return Err(GatewayError::Unauthorized { decision });
            }
        }

        tracing::info!(
            request_id = %request_id,
            method = %method,
            target = %target_url,
            "Proxying request"
        );

        match self.forwarder.forward(request, &target_url).await {
            Ok(result) => {
                tracing::debug!(
                    request_id = %request_id,
                    status = result.status.as_u16(),
                    "Upstream responded"
                );
                Ok(relay(result))
            }
            Err(err) => {
                tracing::error!(request_id = %request_id, error = %err, "Forwarding failed");
                Err(err)
            }
        }
    }
}
