//! Request-level error taxonomy.
//!
//! Every variant is terminal for the request that produced it and never
//! fatal to the process. The caller only ever sees a status code and a
//! generic `{"error": "..."}` envelope; the detail carried by each variant
//! is for server-side logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::AuthDecision;
use crate::http::response::error_response;

/// Errors that end a single request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No route prefix matched the request path.
    #[error("no route matches path {path}")]
    RouteNotFound { path: String },

    /// Gated route, but the request carried no usable `Authorization` header.
    #[error("authorization header missing")]
    MissingCredential,

    /// The auth service answered with a non-200 status.
    #[error("auth service rejected credential with status {status}")]
    CredentialDenied { status: u16 },

    /// The auth service could not be reached (connect error, DNS, timeout).
    #[error("auth service unreachable: {reason}")]
    AuthServiceUnreachable { reason: String },

    /// The gate refused a gated request. The cause was logged by the gate.
    #[error("request not authorized ({decision:?})")]
    Unauthorized { decision: AuthDecision },

    /// The outbound request could not be built.
    #[error("failed to build request to {target}: {reason}")]
    OutboundRequestMalformed { target: String, reason: String },

    /// The backend could not be reached or did not answer in time.
    #[error("backend {target} unreachable: {reason}")]
    BackendUnreachable { target: String, reason: String },
}

impl GatewayError {
    /// HTTP status returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::MissingCredential
            | GatewayError::CredentialDenied { .. }
            | GatewayError::AuthServiceUnreachable { .. }
            | GatewayError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            GatewayError::OutboundRequestMalformed { .. }
            | GatewayError::BackendUnreachable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the caller-facing envelope.
    ///
    /// All authorization failures share one message so a caller cannot tell
    /// a bad token from an unavailable auth service.
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::RouteNotFound { .. } => "Not found",
            GatewayError::MissingCredential
            | GatewayError::CredentialDenied { .. }
            | GatewayError::AuthServiceUnreachable { .. }
            | GatewayError::Unauthorized { .. } => "Unauthorized",
            GatewayError::OutboundRequestMalformed { .. } => "Failed to create request",
            GatewayError::BackendUnreachable { .. } => "Failed to proxy request",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.public_message())
    }
}

/// Result type for request handling.
pub type GatewayResult<T> = Result<T, GatewayError>;
