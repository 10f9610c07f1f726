//! HTTP edge gateway library.
//!
//! Routes requests by path prefix, gates protected prefixes through an
//! external auth service, and streams backend responses back to callers.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod routing;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
