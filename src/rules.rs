//! Immutable rule tables built from configuration.
//!
//! A [`RuleSet`] is created once per analysis session and is read-only for
//! the remainder of the session; checking never mutates it, so it can be
//! shared across parallel per-file analyses.

use std::collections::HashMap;

use tracing::debug;

use crate::matcher::SourcePattern;

/// A restriction keyed by an exact module-source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    source: String,
    message: Option<String>,
    restricted_names: Option<Vec<String>>,
}

impl PathRule {
    pub(crate) fn new(
        source: String,
        message: Option<String>,
        restricted_names: Option<Vec<String>>,
    ) -> Self {
        Self {
            source,
            message,
            restricted_names,
        }
    }

    /// Returns the exact module source this rule restricts.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the configured message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the restricted names, or `None` when the whole module is
    /// restricted.
    #[must_use]
    pub fn restricted_names(&self) -> Option<&[String]> {
        self.restricted_names.as_deref()
    }
}

/// A restriction keyed by a glob-style match over the module source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pattern: SourcePattern,
    message: Option<String>,
}

impl PatternRule {
    pub(crate) fn new(pattern: SourcePattern, message: Option<String>) -> Self {
        Self { pattern, message }
    }

    /// Returns the raw pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the configured message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Tests whether a module source matches this rule's pattern.
    #[must_use]
    pub fn matches(&self, source: &str) -> bool {
        self.pattern.matches(source)
    }
}

/// The two immutable rule tables: exact-source rules and ordered pattern
/// rules.
///
/// Pattern rules keep configuration order; evaluation scans them in that
/// order and the first match wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    paths: HashMap<String, PathRule>,
    patterns: Vec<PatternRule>,
}

impl RuleSet {
    /// Folds validated rules into the two tables.
    ///
    /// Path rules sharing a `source` overwrite earlier ones: last write wins.
    pub(crate) fn from_parts(path_rules: Vec<PathRule>, pattern_rules: Vec<PatternRule>) -> Self {
        let mut paths = HashMap::with_capacity(path_rules.len());
        for rule in path_rules {
            paths.insert(rule.source.clone(), rule);
        }
        debug!(
            "built rule tables: {} path rule(s), {} pattern rule(s)",
            paths.len(),
            pattern_rules.len()
        );
        Self {
            paths,
            patterns: pattern_rules,
        }
    }

    /// Creates an empty rule set (no restrictions).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if both tables are empty.
    ///
    /// Hosts must skip per-statement work entirely for an empty rule set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.patterns.is_empty()
    }

    /// Looks up the exact-source rule for a module source.
    #[must_use]
    pub fn path_rule(&self, source: &str) -> Option<&PathRule> {
        self.paths.get(source)
    }

    /// Returns the first pattern rule matching a module source, in
    /// configuration order.
    #[must_use]
    pub fn first_pattern_match(&self, source: &str) -> Option<&PatternRule> {
        self.patterns.iter().find(|rule| rule.matches(source))
    }

    /// Returns true if any pattern rules are configured.
    #[must_use]
    pub fn has_pattern_rules(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Number of exact-source rules.
    #[must_use]
    pub fn path_rule_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of pattern rules.
    #[must_use]
    pub fn pattern_rule_count(&self) -> usize {
        self.patterns.len()
    }
}
