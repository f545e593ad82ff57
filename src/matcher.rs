//! Glob-style matching of module sources.
//!
//! Pattern rules use standard ignore-file semantics: `*`, `**`, `!` negation
//! prefixes, and anchored/unanchored forms, matched against the module-source
//! string as a path.

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// A validated source pattern.
///
/// The pattern is compiled once at construction and reused for all match
/// calls.
#[derive(Debug, Clone)]
pub struct SourcePattern {
    raw: String,
    compiled: Gitignore,
}

impl SourcePattern {
    /// Creates a new source pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is empty or has invalid glob syntax.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }
        let mut builder = GitignoreBuilder::new("");
        builder
            .add_line(None, pattern)
            .map_err(|e| PatternError::Invalid {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        let compiled = builder.build().map_err(|e| PatternError::Invalid {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            compiled,
        })
    }

    /// Tests whether a module source matches this pattern.
    ///
    /// A negated pattern (`!`) never matches; absence of a match is a normal
    /// outcome, not an error.
    #[must_use]
    pub fn matches(&self, source: &str) -> bool {
        self.compiled.matched(source, false).is_ignore()
    }

    /// Returns the pattern as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for SourcePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for SourcePattern {}

/// Errors in source pattern construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
    /// Pattern is empty.
    #[error("restriction pattern must not be empty")]
    Empty,

    /// Pattern has invalid glob syntax.
    #[error("invalid restriction pattern `{pattern}`: {reason}")]
    Invalid {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },
}
