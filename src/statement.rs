//! Parser-facing statement model.
//!
//! The engine does not tokenize or parse source text; an external parser
//! walks the syntax tree in source order and hands over one
//! [`ImportStatement`] per qualifying declaration.

use serde::{Deserialize, Serialize};

use crate::types::Location;

/// Kind of module declaration the engine checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementKind {
    /// `import ... from "src"`
    Import,
    /// `export { a, b } from "src"`
    ReexportNamed,
    /// `export * from "src"`
    ReexportAll,
}

/// Kind of bound name within a statement's specifier list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecifierKind {
    /// `import x from "src"`
    Default,
    /// `import * as ns from "src"`
    Namespace,
    /// `import { x } from "src"` / `export { x } from "src"`
    Named,
}

/// One bound name within a statement's specifier list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifier {
    /// Kind of binding.
    pub kind: SpecifierKind,
    /// External (imported) name, for named specifiers that have one.
    pub imported: Option<String>,
    /// Local binding name.
    pub local: Option<String>,
    /// Location of this specifier.
    pub location: Location,
}

impl Specifier {
    /// Creates a default-binding specifier (`import x from "src"`).
    #[must_use]
    pub fn default_binding(local: impl Into<String>, location: Location) -> Self {
        Self {
            kind: SpecifierKind::Default,
            imported: None,
            local: Some(local.into()),
            location,
        }
    }

    /// Creates a namespace specifier (`import * as ns from "src"`).
    #[must_use]
    pub fn namespace(local: impl Into<String>, location: Location) -> Self {
        Self {
            kind: SpecifierKind::Namespace,
            imported: None,
            local: Some(local.into()),
            location,
        }
    }

    /// Creates a named specifier with an explicit external name.
    #[must_use]
    pub fn named(imported: impl Into<String>, location: Location) -> Self {
        Self {
            kind: SpecifierKind::Named,
            imported: Some(imported.into()),
            local: None,
            location,
        }
    }

    /// Creates a named specifier with only a local name (e.g. a bare
    /// re-export of a local binding).
    #[must_use]
    pub fn named_local(local: impl Into<String>, location: Location) -> Self {
        Self {
            kind: SpecifierKind::Named,
            imported: None,
            local: Some(local.into()),
            location,
        }
    }

    /// Sets the local alias (`import { x as y }`).
    #[must_use]
    pub fn with_local(mut self, local: impl Into<String>) -> Self {
        self.local = Some(local.into());
        self
    }
}

/// One import/export declaration, as supplied by the external parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    /// Kind of declaration.
    pub kind: StatementKind,
    /// Module-source string literal, as written (the engine trims it).
    pub source: String,
    /// Location of the whole statement.
    pub location: Location,
    /// Ordered specifier list; empty for `export * from`.
    pub specifiers: Vec<Specifier>,
    /// Location of the `*` token of an `export * from` statement.
    pub star_location: Option<Location>,
}

impl ImportStatement {
    /// Creates an import statement with an empty specifier list.
    #[must_use]
    pub fn import(source: impl Into<String>, location: Location) -> Self {
        Self {
            kind: StatementKind::Import,
            source: source.into(),
            location,
            specifiers: Vec::new(),
            star_location: None,
        }
    }

    /// Creates a named re-export statement (`export { a } from "src"`).
    #[must_use]
    pub fn reexport_named(source: impl Into<String>, location: Location) -> Self {
        Self {
            kind: StatementKind::ReexportNamed,
            source: source.into(),
            location,
            specifiers: Vec::new(),
            star_location: None,
        }
    }

    /// Creates a blanket re-export statement (`export * from "src"`).
    #[must_use]
    pub fn reexport_all(source: impl Into<String>, location: Location) -> Self {
        Self {
            kind: StatementKind::ReexportAll,
            source: source.into(),
            location,
            specifiers: Vec::new(),
            star_location: None,
        }
    }

    /// Appends a specifier to this statement.
    #[must_use]
    pub fn with_specifier(mut self, specifier: Specifier) -> Self {
        self.specifiers.push(specifier);
        self
    }

    /// Sets the location of the `*` token for a blanket re-export.
    #[must_use]
    pub fn with_star_location(mut self, location: Location) -> Self {
        self.star_location = Some(location);
        self
    }
}
