//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate bind address and auth endpoint
//! - Detect malformed and conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::routing::{RouteError, RouteTable};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("auth.validate_url {url:?} is invalid: {reason}")]
    InvalidValidateUrl { url: String, reason: String },

    #[error("auth.token_param must not be empty")]
    EmptyTokenParam,

    #[error("no routes configured")]
    NoRoutes,

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Check a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match Url::parse(&config.auth.validate_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidValidateUrl {
            url: config.auth.validate_url.clone(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidValidateUrl {
            url: config.auth.validate_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.auth.token_param.trim().is_empty() {
        errors.push(ValidationError::EmptyTokenParam);
    }

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    } else if let Err(route_errors) = RouteTable::from_config(&config.routes) {
        errors.extend(route_errors.into_iter().map(ValidationError::from));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
