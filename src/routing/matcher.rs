//! Path matching logic.
//!
//! # Responsibilities
//! - Match exact paths
//! - Match path prefixes (resource id in the remainder)
//! - Match prefix + suffix pairs (`/orders/{id}/stream`)
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Plain string tests only, no regex and no segment parsing
//! - A prefix never matches its own bare form: `/orders/` carries no id
//! - Paths with dot or empty segments are not canonical and match nothing

/// A static path predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    /// The path equals this string.
    Exact(&'static str),
    /// The path starts with this string and has a non-empty remainder.
    Prefix(&'static str),
    /// The path starts with the prefix, ends with the suffix, and has a
    /// non-empty segment between them.
    PrefixSuffix(&'static str, &'static str),
}

impl PathPattern {
    /// Returns true if `path` satisfies this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match *self {
            PathPattern::Exact(exact) => path == exact,
            PathPattern::Prefix(prefix) => {
                path.len() > prefix.len() && path.starts_with(prefix)
            }
            PathPattern::PrefixSuffix(prefix, suffix) => {
                path.len() > prefix.len() + suffix.len()
                    && path.starts_with(prefix)
                    && path.ends_with(suffix)
            }
        }
    }

    /// Exact patterns are consulted before any prefix pattern.
    pub fn is_exact(&self) -> bool {
        matches!(self, PathPattern::Exact(_))
    }
}

/// Returns true if `path` is absolute and has no `.`, `..` or empty
/// segments. Dot segments count in their percent-encoded forms too. A
/// single trailing slash is allowed.
pub fn is_canonical(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };

    let mut segments = rest.split('/').peekable();
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        if (segment.is_empty() && !last) || is_dot_segment(segment) {
            return false;
        }
    }
    true
}

fn is_dot_segment(segment: &str) -> bool {
    [".", "..", "%2e", ".%2e", "%2e.", "%2e%2e"]
        .iter()
        .any(|dot| segment.eq_ignore_ascii_case(dot))
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathPattern::Exact(path) => write!(f, "{}", path),
            PathPattern::Prefix(prefix) => write!(f, "{}*", prefix),
            PathPattern::PrefixSuffix(prefix, suffix) => write!(f, "{}*{}", prefix, suffix),
        }
    }
}
