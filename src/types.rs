//! Core types for restriction diagnostics and results.

use miette::SourceSpan;
use serde::{Deserialize, Serialize};

/// Source code location within the file being checked.
///
/// The engine is invoked per file by the host traversal driver, so locations
/// carry no file path; the host owns that association.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit line and column.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Kind of restriction diagnostic.
///
/// Each kind has a fixed message template; the `*Custom` variants append the
/// rule's configured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// The whole module source is restricted by an exact-path rule.
    PathWhole,
    /// Same as [`PathWhole`](Self::PathWhole), with a configured message.
    PathWholeCustom,
    /// The module source is restricted by a pattern rule.
    PatternWhole,
    /// Same as [`PatternWhole`](Self::PatternWhole), with a configured message.
    PatternWholeCustom,
    /// A namespace import or blanket re-export pulls in restricted names.
    EverythingRestricted,
    /// Same as [`EverythingRestricted`](Self::EverythingRestricted), with a configured message.
    EverythingRestrictedCustom,
    /// A specific imported name is restricted.
    NameRestricted,
    /// Same as [`NameRestricted`](Self::NameRestricted), with a configured message.
    NameRestrictedCustom,
}

impl DiagnosticKind {
    /// Returns the kebab-case name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PathWhole => "path-whole",
            Self::PathWholeCustom => "path-whole-custom",
            Self::PatternWhole => "pattern-whole",
            Self::PatternWholeCustom => "pattern-whole-custom",
            Self::EverythingRestricted => "everything-restricted",
            Self::EverythingRestrictedCustom => "everything-restricted-custom",
            Self::NameRestricted => "name-restricted",
            Self::NameRestrictedCustom => "name-restricted-custom",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A restriction violation found while checking a statement.
///
/// Diagnostics are created per statement and handed to the host; the engine
/// retains no reference to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Kind of violation.
    pub kind: DiagnosticKind,
    /// Location the diagnostic is attributed to.
    pub location: Location,
    /// The (trimmed) module source of the offending statement.
    pub import_source: String,
    /// The restricted name, or the rendered restricted-name list for
    /// `EverythingRestricted` kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_name: Option<String>,
    /// The rule's configured message, for `*Custom` kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

impl Diagnostic {
    /// Creates a whole-module diagnostic for an exact-path rule.
    #[must_use]
    pub fn path_whole(
        location: Location,
        import_source: impl Into<String>,
        custom_message: Option<&str>,
    ) -> Self {
        let custom_message = custom_message.map(str::to_owned);
        Self {
            kind: if custom_message.is_some() {
                DiagnosticKind::PathWholeCustom
            } else {
                DiagnosticKind::PathWhole
            },
            location,
            import_source: import_source.into(),
            import_name: None,
            custom_message,
        }
    }

    /// Creates a whole-module diagnostic for a pattern rule.
    #[must_use]
    pub fn pattern_whole(
        location: Location,
        import_source: impl Into<String>,
        custom_message: Option<&str>,
    ) -> Self {
        let custom_message = custom_message.map(str::to_owned);
        Self {
            kind: if custom_message.is_some() {
                DiagnosticKind::PatternWholeCustom
            } else {
                DiagnosticKind::PatternWhole
            },
            location,
            import_source: import_source.into(),
            import_name: None,
            custom_message,
        }
    }

    /// Creates a diagnostic for a namespace import or blanket re-export of a
    /// source with name-scoped restrictions.
    ///
    /// `import_name` is the rendered list of restricted names.
    #[must_use]
    pub fn everything_restricted(
        location: Location,
        import_source: impl Into<String>,
        import_name: impl Into<String>,
        custom_message: Option<&str>,
    ) -> Self {
        let custom_message = custom_message.map(str::to_owned);
        Self {
            kind: if custom_message.is_some() {
                DiagnosticKind::EverythingRestrictedCustom
            } else {
                DiagnosticKind::EverythingRestricted
            },
            location,
            import_source: import_source.into(),
            import_name: Some(import_name.into()),
            custom_message,
        }
    }

    /// Creates a diagnostic for one occurrence of a restricted name.
    #[must_use]
    pub fn name_restricted(
        location: Location,
        import_source: impl Into<String>,
        import_name: impl Into<String>,
        custom_message: Option<&str>,
    ) -> Self {
        let custom_message = custom_message.map(str::to_owned);
        Self {
            kind: if custom_message.is_some() {
                DiagnosticKind::NameRestrictedCustom
            } else {
                DiagnosticKind::NameRestricted
            },
            location,
            import_source: import_source.into(),
            import_name: Some(import_name.into()),
            custom_message,
        }
    }

    /// Renders the human-readable message for this diagnostic.
    ///
    /// Templates are fixed per [`DiagnosticKind`].
    #[must_use]
    pub fn message(&self) -> String {
        let source = &self.import_source;
        let name = self.import_name.as_deref().unwrap_or_default();
        let custom = self.custom_message.as_deref().unwrap_or_default();
        match self.kind {
            DiagnosticKind::PathWhole => {
                format!("'{source}' import is restricted from being used.")
            }
            DiagnosticKind::PathWholeCustom => {
                format!("'{source}' import is restricted from being used. {custom}")
            }
            DiagnosticKind::PatternWhole => {
                format!("'{source}' import is restricted from being used by a pattern.")
            }
            DiagnosticKind::PatternWholeCustom => {
                format!("'{source}' import is restricted from being used by a pattern. {custom}")
            }
            DiagnosticKind::EverythingRestricted => {
                format!("* import is invalid because '{name}' from '{source}' is restricted.")
            }
            DiagnosticKind::EverythingRestrictedCustom => {
                format!(
                    "* import is invalid because '{name}' from '{source}' is restricted. {custom}"
                )
            }
            DiagnosticKind::NameRestricted => {
                format!("'{name}' import from '{source}' is restricted.")
            }
            DiagnosticKind::NameRestrictedCustom => {
                format!("'{name}' import from '{source}' is restricted. {custom}")
            }
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}",
            self.location.line,
            self.location.column,
            self.kind,
            self.message()
        )
    }
}

/// Converts a [`Diagnostic`] to a miette diagnostic for rich error display.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct RestrictionDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Diagnostic> for RestrictionDiagnostic {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: d.message(),
            help: d.custom_message.clone(),
            span: SourceSpan::from((d.location.offset, d.location.length)),
            label_message: d.kind.as_str().to_string(),
        }
    }
}

/// Result of checking a file's statements against the rule tables.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// All diagnostics found, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of statements checked.
    pub statements_checked: usize,
}

impl CheckReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any diagnostics were produced.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Adds diagnostics from another report.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.statements_checked += other.statements_checked;
    }
}
