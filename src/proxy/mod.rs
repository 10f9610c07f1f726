//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request + matched route
//!     → forwarder.rs (outbound URL, same method/body)
//!     → headers.rs (pass-through policy)
//!     → pooled hyper client → backend
//!     → ForwardResult { status, content type, unread body }
//! ```

pub mod forwarder;
pub mod headers;

pub use forwarder::{outbound_url, ForwardResult, ProxyForwarder};
