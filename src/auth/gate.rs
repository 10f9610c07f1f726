//! Authorization gate for protected routes.
//!
//! # Responsibilities
//! - Extract the `Authorization` header value
//! - Ask the auth service whether the token is valid
//! - Classify the outcome as Allowed / Denied / ServiceUnavailable
//!
//! # Design Decisions
//! - Fail closed: a missing header, a rejection and an unreachable auth
//!   service all deny the request
//! - Every gated request re-validates; decisions are never cached
//! - The header value is passed through untouched as the token

use std::time::Duration;

use axum::http::{header, HeaderMap};
use reqwest::StatusCode;
use url::Url;

use crate::config::{AuthConfig, TimeoutConfig};
use crate::error::{GatewayError, GatewayResult};
use crate::http::request_id;
use crate::resilience::timeouts::{self, with_deadline};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed,
    Denied,
    /// The auth service could not be asked. Gates exactly like `Denied`.
    ServiceUnavailable,
}

impl AuthDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AuthDecision::Allowed)
    }
}

impl From<&GatewayResult<()>> for AuthDecision {
    fn from(result: &GatewayResult<()>) -> Self {
        match result {
            Ok(()) => AuthDecision::Allowed,
            Err(GatewayError::AuthServiceUnreachable { .. }) => AuthDecision::ServiceUnavailable,
            Err(_) => AuthDecision::Denied,
        }
    }
}

/// Error building the gate at startup.
#[derive(Debug, thiserror::Error)]
pub enum AuthGateError {
    #[error("invalid auth validation URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build auth client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Client for the external auth service.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct AuthGate {
    client: reqwest::Client,
    validate_url: Url,
    token_param: String,
    deadline: Option<Duration>,
}

impl AuthGate {
    pub fn new(config: &AuthConfig, timeouts: &TimeoutConfig) -> Result<Self, AuthGateError> {
        let validate_url =
            Url::parse(&config.validate_url).map_err(|source| AuthGateError::InvalidUrl {
                url: config.validate_url.clone(),
                source,
            })?;

        // The auth service is an internal peer; environment proxies do not apply.
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(connect) = timeouts::from_secs(timeouts.connect_secs) {
            builder = builder.connect_timeout(connect);
        }

        Ok(Self {
            client: builder.build()?,
            validate_url,
            token_param: config.token_param.clone(),
            deadline: timeouts::from_secs(timeouts.auth_secs),
        })
    }

    /// Classify the request's credential.
    ///
    /// Anything short of `Allowed` is logged here, once, with the detail the
    /// caller never sees.
    pub async fn authorize(&self, headers: &HeaderMap) -> AuthDecision {
        let verdict = self.check(headers).await;
        let decision = AuthDecision::from(&verdict);
        if let Err(err) = verdict {
            tracing::warn!(
                request_id = %request_id(headers),
                decision = ?decision,
                error = %err,
                "Request not authorized"
            );
        }
        decision
    }

    async fn check(&self, headers: &HeaderMap) -> GatewayResult<()> {
        let token = extract_token(headers).ok_or(GatewayError::MissingCredential)?;
        self.validate(token).await
    }

    async fn validate(&self, token: &str) -> GatewayResult<()> {
        let request = self
            .client
            .get(self.validate_url.clone())
            .query(&[(self.token_param.as_str(), token)])
            .send();

        // The request URL carries the token; it must not reach the error text.
        let response = with_deadline(self.deadline, request)
            .await
            .map_err(|elapsed| GatewayError::AuthServiceUnreachable {
                reason: format!("{}: {elapsed}", self.validate_url),
            })?
            .map_err(|e| GatewayError::AuthServiceUnreachable {
                reason: format!("{}: {}", self.validate_url, e.without_url()),
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(GatewayError::CredentialDenied {
                status: status.as_u16(),
            })
        }
    }
}

/// The raw `Authorization` value, if present and non-blank.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(""));
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("   "));
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(extract_token(&headers), Some("Bearer abc"));
    }

    fn decide(result: GatewayResult<()>) -> AuthDecision {
        AuthDecision::from(&result)
    }

    #[test]
    fn test_decision_from_result() {
        assert_eq!(decide(Ok(())), AuthDecision::Allowed);
        assert_eq!(decide(Err(GatewayError::MissingCredential)), AuthDecision::Denied);
        assert_eq!(
            decide(Err(GatewayError::CredentialDenied { status: 401 })),
            AuthDecision::Denied
        );
        assert_eq!(
            decide(Err(GatewayError::AuthServiceUnreachable {
                reason: "refused".into()
            })),
            AuthDecision::ServiceUnavailable
        );
        assert!(!AuthDecision::ServiceUnavailable.is_allowed());
    }

    #[tokio::test]
    async fn test_missing_header_denied_without_network() {
        // Nothing listens on port 1; a network call would yield ServiceUnavailable.
        let config = AuthConfig {
            validate_url: "http://127.0.0.1:1/validate".into(),
            token_param: "token".into(),
        };
        let gate = AuthGate::new(&config, &TimeoutConfig::default()).unwrap();
        assert_eq!(gate.authorize(&HeaderMap::new()).await, AuthDecision::Denied);
    }

    #[tokio::test]
    async fn test_outage_detail_omits_token() {
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = closed.local_addr().unwrap();
        drop(closed);

        let config = AuthConfig {
            validate_url: format!("http://{addr}/validate"),
            token_param: "token".into(),
        };
        let gate = AuthGate::new(&config, &TimeoutConfig::default()).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer SECRET123"));

        let err = gate.check(&headers).await.unwrap_err();
        assert!(matches!(err, GatewayError::AuthServiceUnreachable { .. }));
        let detail = err.to_string();
        assert!(!detail.contains("SECRET123"), "token leaked: {detail}");
        assert!(detail.contains("/validate"));
    }
}
