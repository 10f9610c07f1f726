//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → dispatcher.rs (route → auth gate → forward)
//!     → response.rs (relay backend response or JSON error)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::Dispatcher;
pub use request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
