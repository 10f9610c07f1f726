//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the route table, auth gate and forwarder from config
//! - Create Axum Router with the catch-all dispatch handler
//! - Wire up middleware (request ID, tracing)
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthGate, AuthGateError};
use crate::config::GatewayConfig;
use crate::http::dispatcher::Dispatcher;
use crate::http::request::MakeRequestUuidV4;
use crate::proxy::ProxyForwarder;
use crate::routing::{RouteError, RouteTable};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid route table: {}", join(.0))]
    Routes(Vec<RouteError>),

    #[error(transparent)]
    Auth(#[from] AuthGateError),
}

fn join(errors: &[RouteError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let routes = Arc::new(RouteTable::from_config(&config.routes).map_err(ServerError::Routes)?);
        let auth = AuthGate::new(&config.auth, &config.timeouts)?;
        let forwarder = ProxyForwarder::new(&config.timeouts, &config.forwarding);

        tracing::info!(routes = routes.len(), "Route table compiled");
        for entry in routes.entries() {
            tracing::debug!(
                prefix = %entry.prefix(),
                target = %entry.target_base_url,
                requires_auth = entry.requires_auth,
                "Route registered"
            );
        }

        let dispatcher = Arc::new(Dispatcher::new(routes, auth, forwarder));
        let router = Self::build_router(dispatcher);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(dispatcher: Arc<Dispatcher>) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(dispatcher)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The assembled router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
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
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

async fn dispatch_handler(
    State(dispatcher): State<Arc<Dispatcher>>,
    request: Request<Body>,
) -> Response {
    dispatcher.dispatch(request).await
}
