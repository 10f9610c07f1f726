//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (segment-aligned prefix check)
//!     → Return: RouteMatch { entry, remainder } or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Validate prefixes and target URLs
//!     → Reject overlapping prefixes
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes are data, not one handler per backend
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use router::{RouteEntry, RouteError, RouteMatch, RouteTable};
