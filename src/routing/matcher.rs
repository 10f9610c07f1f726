//! Path prefix matching.
//!
//! # Responsibilities
//! - Check that a configured prefix is well formed
//! - Match a request path against a prefix on a segment boundary
//! - Detect prefixes that would both match the same path
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - `/user` matches `/user`, `/user/` and `/user/x`, never `/username`
//! - No regex to guarantee O(n) matching

/// Matches the request path against a segment-aligned prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a matcher after checking the prefix shape.
    pub fn new(prefix: impl Into<String>) -> Result<Self, &'static str> {
        let prefix = prefix.into();
        check_prefix(&prefix)?;
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the part of `path` after the prefix, or `None` on no match.
    ///
    /// The remainder is empty or starts with `/`.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// True when some path would be matched by both prefixes.
    pub fn overlaps(&self, other: &PathPrefixMatcher) -> bool {
        self.strip(&other.prefix).is_some() || other.strip(&self.prefix).is_some()
    }
}

/// Validate the shape of a route prefix.
pub fn check_prefix(prefix: &str) -> Result<(), &'static str> {
    if !prefix.starts_with('/') {
        return Err("must start with '/'");
    }
    if prefix.len() == 1 {
        return Err("'/' alone would shadow every other route");
    }
    if prefix.ends_with('/') {
        return Err("must not end with '/'");
    }
    if prefix.contains("//") {
        return Err("must not contain empty segments");
    }
    if prefix
        .chars()
        .any(|c| c == '?' || c == '#' || c.is_whitespace() || c.is_control())
    {
        return Err("must be a plain path without query, fragment or whitespace");
    }
    Ok(())
}
