//! Declaration name extraction.
//!
//! Pure extraction step: given one statement, produce its trimmed module
//! source and a mapping from name-key to the ordered list of locations where
//! that name occurs. No diagnostics are produced here.

use std::collections::HashMap;

use crate::statement::{ImportStatement, SpecifierKind, StatementKind};
use crate::types::Location;

/// Name-key for default-binding specifiers.
pub const DEFAULT_KEY: &str = "default";

/// Name-key for namespace specifiers and blanket re-exports.
pub const STAR_KEY: &str = "*";

/// Module source plus every bound name and where it occurs.
///
/// Occurrence lists keep encounter order and never drop duplicates: two
/// specifiers binding the same name yield two entries under one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedNames {
    source: String,
    occurrences: HashMap<String, Vec<Location>>,
}

impl ExtractedNames {
    /// Returns the trimmed module source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the full name-key to occurrence-list mapping.
    #[must_use]
    pub fn occurrences(&self) -> &HashMap<String, Vec<Location>> {
        &self.occurrences
    }

    /// Returns the occurrences of a name-key, in encounter order.
    #[must_use]
    pub fn occurrences_of(&self, key: &str) -> &[Location] {
        self.occurrences.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns the first occurrence of a name-key, if any.
    #[must_use]
    pub fn first_occurrence(&self, key: &str) -> Option<&Location> {
        self.occurrences.get(key).and_then(|locs| locs.first())
    }

    /// Returns true if the statement bound this name-key at least once.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.occurrences.contains_key(key)
    }
}

/// Extracts the module source and name occurrences from one statement.
///
/// Name-keys are derived per specifier: default binding maps to
/// [`DEFAULT_KEY`], namespace binding to [`STAR_KEY`], and a named specifier
/// to its external (imported) name, falling back to the local name when the
/// external one is absent. A blanket re-export yields a single [`STAR_KEY`]
/// occurrence at the `*` token (falling back to the statement location if the
/// parser supplied none).
#[must_use]
pub fn extract(statement: &ImportStatement) -> ExtractedNames {
    let source = statement.source.trim().to_string();
    let mut occurrences: HashMap<String, Vec<Location>> = HashMap::new();

    if statement.kind == StatementKind::ReexportAll {
        let location = statement
            .star_location
            .clone()
            .unwrap_or_else(|| statement.location.clone());
        occurrences.insert(STAR_KEY.to_string(), vec![location]);
        return ExtractedNames {
            source,
            occurrences,
        };
    }

    for specifier in &statement.specifiers {
        let key = match specifier.kind {
            SpecifierKind::Default => DEFAULT_KEY.to_string(),
            SpecifierKind::Namespace => STAR_KEY.to_string(),
            SpecifierKind::Named => specifier
                .imported
                .clone()
                .or_else(|| specifier.local.clone())
                .unwrap_or_default(),
        };
        occurrences
            .entry(key)
            .or_default()
            .push(specifier.location.clone());
    }

    ExtractedNames {
        source,
        occurrences,
    }
}
