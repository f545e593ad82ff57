//! # restrict-imports
//!
//! Restriction-matching engine for module import/export declarations.
//!
//! Given a configured set of forbidden module sources (exact names and/or
//! glob-style patterns, optionally scoped to specific named bindings), and a
//! stream of already-parsed import/export statements, the engine decides
//! which statements violate which rules and emits location-attributed
//! [`Diagnostic`]s.
//!
//! Parsing, configuration-schema validation, console rendering, and the tree
//! traversal that visits statements in source order are host concerns; the
//! engine operates purely on the module-source literal and specifier-list
//! shape of each statement.
//!
//! ## Example
//!
//! ```ignore
//! use restrict_imports::{ImportRuleEngine, RuleSet};
//!
//! let rules = RuleSet::from_json_str(r#"{"paths": ["fs"], "patterns": ["lodash/*"]}"#)?;
//! let engine = ImportRuleEngine::new(rules);
//!
//! if !engine.is_noop() {
//!     for statement in statements {
//!         for diagnostic in engine.check(&statement) {
//!             println!("{diagnostic}");
//!         }
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod extractor;
mod matcher;
mod rules;
mod statement;
mod types;

pub use config::ConfigError;
pub use engine::ImportRuleEngine;
pub use extractor::{extract, ExtractedNames, DEFAULT_KEY, STAR_KEY};
pub use matcher::{PatternError, SourcePattern};
pub use rules::{PathRule, PatternRule, RuleSet};
pub use statement::{ImportStatement, Specifier, SpecifierKind, StatementKind};
pub use types::{CheckReport, Diagnostic, DiagnosticKind, Location, RestrictionDiagnostic};
