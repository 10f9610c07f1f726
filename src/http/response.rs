//! Response construction.
//!
//! # Responsibilities
//! - Build the JSON error envelope returned on 401/404/500
//! - Relay a backend response to the caller (status, content type, body)
//!
//! # Design Decisions
//! - Only `Content-Type` is carried over from the backend
//! - The body is wrapped, never collected, so it streams frame by frame

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::proxy::ForwardResult;

/// Caller-facing error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'a> {
    pub error: &'a str,
}

/// Build an error response with the JSON envelope.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorEnvelope { error: message })).into_response()
}

/// Turn a backend result into the response written to the caller.
pub fn relay(result: ForwardResult) -> Response {
    let mut response = Response::new(Body::new(result.body));
    *response.status_mut() = result.status;
    if let Some(content_type) = result.content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn envelope_has_error_field() {
        let response = error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"], "Unauthorized");
    }
}
