//! Route table lookup.
//!
//! # Responsibilities
//! - Store compiled route entries
//! - Look up the entry owning a request path
//! - Return matched entry or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan (acceptable for typical route counts)
//! - Overlapping prefixes are rejected at construction, not at request time
//! - Explicit NoMatch rather than silent default

use thiserror::Error;
use url::Url;

use crate::config::RouteConfig;
use crate::routing::matcher::{check_prefix, PathPrefixMatcher};

/// Errors found while compiling the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route prefix {prefix:?} {reason}")]
    InvalidPrefix { prefix: String, reason: &'static str },

    #[error("service path {service_path:?} of route {prefix:?} {reason}")]
    InvalidServicePath {
        prefix: String,
        service_path: String,
        reason: &'static str,
    },

    #[error("target {target:?} of route {prefix:?} {reason}")]
    InvalidTarget {
        prefix: String,
        target: String,
        reason: String,
    },

    #[error("route prefixes {first:?} and {second:?} overlap")]
    Overlapping { first: String, second: String },
}

/// One compiled route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    matcher: PathPrefixMatcher,
    /// Backend base URL without trailing slash (e.g. `http://localhost:8083`).
    pub target_base_url: String,
    /// Path segment prepended when forwarding.
    pub service_path: String,
    pub requires_auth: bool,
}

impl RouteEntry {
    /// Externally visible prefix.
    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    /// Path after the prefix; empty or starting with `/`.
    pub remainder: &'a str,
}

/// Immutable prefix → backend table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Compile routes from configuration.
    ///
    /// Collects every problem instead of stopping at the first one.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, Vec<RouteError>> {
        let mut errors = Vec::new();
        let mut entries: Vec<RouteEntry> = Vec::with_capacity(routes.len());

        for route in routes {
            match compile_route(route) {
                Ok(entry) => {
                    if let Some(existing) = entries
                        .iter()
                        .find(|e| e.matcher.overlaps(&entry.matcher))
                    {
                        errors.push(RouteError::Overlapping {
                            first: existing.prefix().to_string(),
                            second: entry.prefix().to_string(),
                        });
                    } else {
                        entries.push(entry);
                    }
                }
                Err(e) => errors.extend(e),
            }
        }

        if errors.is_empty() {
            Ok(Self { entries })
        } else {
            Err(errors)
        }
    }

    /// Find the route that owns `path`.
    ///
    /// Prefixes are disjoint, but the longest match is still preferred so the
    /// result never depends on declaration order.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .matcher
                    .strip(path)
                    .map(|remainder| RouteMatch { entry, remainder })
            })
            .max_by_key(|m| m.entry.prefix().len())
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn compile_route(route: &RouteConfig) -> Result<RouteEntry, Vec<RouteError>> {
    let mut errors = Vec::new();

    let matcher = match PathPrefixMatcher::new(route.prefix.clone()) {
        Ok(m) => Some(m),
        Err(reason) => {
            errors.push(RouteError::InvalidPrefix {
                prefix: route.prefix.clone(),
                reason,
            });
            None
        }
    };

    let service_path = route
        .service_path
        .clone()
        .unwrap_or_else(|| route.prefix.clone());
    // An empty service path forwards the remainder straight to the backend root.
    if !service_path.is_empty() {
        if let Err(reason) = check_prefix(&service_path) {
            errors.push(RouteError::InvalidServicePath {
                prefix: route.prefix.clone(),
                service_path: service_path.clone(),
                reason,
            });
        }
    }

    let target_base_url = match check_target(&route.target) {
        Ok(base) => Some(base),
        Err(reason) => {
            errors.push(RouteError::InvalidTarget {
                prefix: route.prefix.clone(),
                target: route.target.clone(),
                reason,
            });
            None
        }
    };

    match (matcher, target_base_url) {
        (Some(matcher), Some(target_base_url)) if errors.is_empty() => Ok(RouteEntry {
            matcher,
            target_base_url,
            service_path,
            requires_auth: route.requires_auth,
        }),
        _ => Err(errors),
    }
}

/// Check a backend base URL and return it without a trailing slash.
fn check_target(target: &str) -> Result<String, String> {
    let url = Url::parse(target).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("uses unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("has no host".to_string());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("must be a base URL without path, query or fragment".to_string());
    }
    Ok(target.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_routes;

    fn table(routes: Vec<RouteConfig>) -> RouteTable {
        RouteTable::from_config(&routes).unwrap()
    }

    #[test]
    fn test_default_table_resolves_every_service() {
        let table = table(default_routes());
        assert_eq!(table.len(), 10);

        let m = table.resolve("/cart/items/5").unwrap();
        assert_eq!(m.entry.prefix(), "/cart");
        assert_eq!(m.entry.target_base_url, "http://localhost:8084");
        assert_eq!(m.entry.service_path, "/cart");
        assert!(m.entry.requires_auth);
        assert_eq!(m.remainder, "/items/5");

        let m = table.resolve("/product/create").unwrap();
        assert!(!m.entry.requires_auth);

        let m = table.resolve("/review/42").unwrap();
        assert!(!m.entry.requires_auth);
        assert_eq!(m.entry.target_base_url, "http://localhost:8090");
    }

    #[test]
    fn test_no_match() {
        let table = table(default_routes());
        assert!(table.resolve("/").is_none());
        assert!(table.resolve("/inventory/1").is_none());
        assert!(table.resolve("/users").is_none());
    }

    #[test]
    fn test_bare_prefix_matches_with_empty_remainder() {
        let table = table(default_routes());
        let m = table.resolve("/user").unwrap();
        assert_eq!(m.entry.prefix(), "/user");
        assert_eq!(m.remainder, "");
    }

    #[test]
    fn test_custom_service_path() {
        let mut route = RouteConfig::new("/shop", "http://10.0.0.5:9000/", false);
        route.service_path = Some("/api/shop".into());
        let table = table(vec![route]);

        let m = table.resolve("/shop/x").unwrap();
        assert_eq!(m.entry.target_base_url, "http://10.0.0.5:9000");
        assert_eq!(m.entry.service_path, "/api/shop");
    }

    #[test]
    fn test_overlapping_prefixes_rejected() {
        let errors = RouteTable::from_config(&[
            RouteConfig::new("/api", "http://localhost:1", false),
            RouteConfig::new("/api/v1", "http://localhost:2", false),
        ])
        .unwrap_err();

        assert_eq!(
            errors,
            vec![RouteError::Overlapping {
                first: "/api".into(),
                second: "/api/v1".into(),
            }]
        );
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let errors = RouteTable::from_config(&[
            RouteConfig::new("/user", "http://localhost:1", true),
            RouteConfig::new("/user", "http://localhost:2", false),
        ])
        .unwrap_err();
        assert!(matches!(errors[0], RouteError::Overlapping { .. }));
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = RouteTable::from_config(&[
            RouteConfig::new("user", "http://localhost:1", true),
            RouteConfig::new("/cart", "https://localhost:2", true),
            RouteConfig::new("/order", "http://localhost:3/base", true),
            RouteConfig::new("/pay", "not a url", true),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], RouteError::InvalidPrefix { .. }));
        assert!(errors[1..]
            .iter()
            .all(|e| matches!(e, RouteError::InvalidTarget { .. })));
    }
}
