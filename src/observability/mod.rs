//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → TraceLayer spans per request (tower-http)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - One info line per forwarded request, with its target URL

pub mod logging;
