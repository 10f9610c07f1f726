//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call (auth service or backend):
//!     → timeouts.rs (enforce configured deadline)
//!     → On expiry: the call is dropped and reported as unreachable
//! ```
//!
//! # Design Decisions
//! - Every outbound call can be bounded; the bound is explicit config
//! - No retries, no circuit breaking: every failure is terminal per request

pub mod timeouts;
