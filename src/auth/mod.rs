//! Authorization subsystem.
//!
//! # Data Flow
//! ```text
//! Request on a route with requires_auth
//!     → gate.rs (extract Authorization, call auth service)
//!     → AuthDecision: Allowed | Denied | ServiceUnavailable
//!     → dispatcher forwards on Allowed, answers 401 otherwise
//! ```

pub mod gate;

pub use gate::{AuthDecision, AuthGate, AuthGateError};
