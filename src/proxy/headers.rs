//! Header handling for forwarded requests.
//!
//! # Responsibilities
//! - Pass the caller's headers through to the backend
//! - Optionally strip hop-by-hop headers
//! - Optionally drop the caller's `Host` so the backend authority is used
//!
//! # Design Decisions
//! - Default is verbatim pass-through, every name and every value
//! - Headers named in `Connection` are hop-by-hop too (RFC 9110 §7.6.1)

use axum::http::{header, HeaderMap, HeaderName};

use crate::config::ForwardingConfig;

/// Headers that only apply to a single transport hop.
pub const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Apply the configured header policy to an outbound header map.
pub fn prepare_headers(headers: &mut HeaderMap, config: &ForwardingConfig) {
    if config.strip_hop_by_hop {
        strip_hop_by_hop(headers);
    }
    if !config.preserve_host {
        headers.remove(header::HOST);
    }
}

/// Remove hop-by-hop headers, including those listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}
