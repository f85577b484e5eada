//! Namespace normalization and key rewriting.
//!
//! A [`Namespace`] is the pure part of the isolation layer: it turns logical
//! keys (what a tenant sees) into physical keys (what Redis stores) and back.
//! No I/O happens here.

/// Separator between the namespace prefix and the logical key.
pub const SEPARATOR: char = ':';

/// A normalized namespace prefix.
///
/// Normalization appends the separator when it is absent, so `"auth"` and
/// `"auth:"` produce the same prefix. The namespace is immutable for the
/// lifetime of any wrapper built from it.
///
/// Physical keys are a raw concatenation of prefix and logical key. Logical
/// keys that themselves contain the separator are indistinguishable from keys
/// in a sub-namespace; this is accepted behavior, not escaped away, because
/// escaping would break reading the physical key directly on the shared
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
}

impl Namespace {
    /// Create a namespace from any string, appending the separator if absent.
    ///
    /// The empty string is a degenerate but legal namespace with prefix `":"`.
    pub fn new(namespace: impl Into<String>) -> Self {
        let mut prefix = namespace.into();
        if !prefix.ends_with(SEPARATOR) {
            prefix.push(SEPARATOR);
        }
        Self { prefix }
    }

    /// The normalized prefix, separator included.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the physical key for a logical key.
    pub fn key(&self, logical: &str) -> String {
        format!("{}{}", self.prefix, logical)
    }

    /// Build the physical form of a glob pattern.
    ///
    /// The prefix is prepended literally; the pattern itself is never
    /// interpreted. A namespace containing glob-special characters produces a
    /// correspondingly-special physical prefix (caller responsibility).
    pub fn pattern(&self, logical_pattern: &str) -> String {
        format!("{}{}", self.prefix, logical_pattern)
    }

    /// Strip the prefix from a physical key, returning the logical key.
    ///
    /// Returns `None` for keys outside this namespace.
    pub fn strip<'a>(&self, physical: &'a str) -> Option<&'a str> {
        physical.strip_prefix(self.prefix.as_str())
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.prefix)
    }
}
