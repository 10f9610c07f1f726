//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Auth service used to validate tokens on gated routes.
    pub auth: AuthConfig,

    /// Route definitions mapping path prefixes to backends.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Header handling on forwarded requests.
    pub forwarding: ForwardingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            auth: AuthConfig::default(),
            routes: default_routes(),
            timeouts: TimeoutConfig::default(),
            forwarding: ForwardingConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Auth service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Validation endpoint; the token is appended as a query parameter.
    pub validate_url: String,

    /// Name of the query parameter carrying the token.
    pub token_param: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            validate_url: "http://localhost:8081/validate".to_string(),
            token_param: "token".to_string(),
        }
    }
}

/// Route configuration mapping a path prefix to a backend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Externally visible path prefix (e.g., "/user").
    pub prefix: String,

    /// Backend base URL (scheme, host, port).
    pub target: String,

    /// Path prepended when forwarding. Defaults to `prefix`.
    #[serde(default)]
    pub service_path: Option<String>,

    /// Whether requests under this prefix must pass the auth gate.
    #[serde(default)]
    pub requires_auth: bool,
}

impl RouteConfig {
    pub fn new(prefix: impl Into<String>, target: impl Into<String>, requires_auth: bool) -> Self {
        Self {
            prefix: prefix.into(),
            target: target.into(),
            service_path: None,
            requires_auth,
        }
    }
}

/// The stock service map used when no routes are configured.
pub fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/auth", "http://localhost:8081", false),
        RouteConfig::new("/product", "http://localhost:8082", false),
        RouteConfig::new("/user", "http://localhost:8083", true),
        RouteConfig::new("/cart", "http://localhost:8084", true),
        RouteConfig::new("/order", "http://localhost:8085", true),
        RouteConfig::new("/payment", "http://localhost:8086", true),
        RouteConfig::new("/shipping", "http://localhost:8087", true),
        RouteConfig::new("/notification", "http://localhost:8088", true),
        RouteConfig::new("/analytics", "http://localhost:8089", true),
        // Backend enforces its own rules.
        RouteConfig::new("/review", "http://localhost:8090", false),
    ]
}

/// Timeout configuration for outbound calls.
///
/// A value of 0 disables the corresponding deadline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// TCP connect timeout for backends and the auth service, in seconds.
    pub connect_secs: u64,

    /// Total time allowed for an auth validation call, in seconds.
    pub auth_secs: u64,

    /// Time allowed until a backend returns response headers, in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            auth_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Header handling for forwarded requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Remove hop-by-hop headers (Connection, Transfer-Encoding, ...) before forwarding.
    pub strip_hop_by_hop: bool,

    /// Forward the caller's `Host` header instead of the backend authority.
    pub preserve_host: bool,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            strip_hop_by_hop: false,
            preserve_host: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
