//! Restriction rule engine.
//!
//! Evaluates the exact-path and pattern rule tables against one statement at
//! a time, producing [`Diagnostic`]s. The two rule families are independent:
//! both may fire on the same statement, and their diagnostics are
//! concatenated, never merged.

use tracing::trace;

use crate::extractor::{extract, ExtractedNames, STAR_KEY};
use crate::rules::RuleSet;
use crate::statement::ImportStatement;
use crate::types::{CheckReport, Diagnostic, Location};

/// Evaluates restriction rules against import/export statements.
///
/// The rule tables are built once per analysis session and are read-only
/// thereafter; each [`check`](Self::check) call is independent and
/// side-effect-free.
pub struct ImportRuleEngine {
    rules: RuleSet,
}

impl ImportRuleEngine {
    /// Creates a new engine over the given rule tables.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Returns the rule tables this engine evaluates.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns true if no rules are configured.
    ///
    /// Hosts should consult this once per session and skip statement
    /// traversal entirely when it holds; [`check`](Self::check) also
    /// short-circuits, so the zero-work contract is kept either way.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.rules.is_empty()
    }

    /// Checks a single statement against both rule tables.
    ///
    /// Diagnostics are returned in emission order: exact-path diagnostics
    /// first, then the pattern diagnostic, if any.
    #[must_use]
    pub fn check(&self, statement: &ImportStatement) -> Vec<Diagnostic> {
        if self.rules.is_empty() {
            return Vec::new();
        }

        let extracted = extract(statement);
        trace!("checking `{}` against rule tables", extracted.source());

        let mut diagnostics = self.check_path(&extracted, &statement.location);
        diagnostics.extend(self.check_pattern(extracted.source(), &statement.location));
        diagnostics
    }

    /// Checks an ordered slice of statements, in source order.
    ///
    /// This is the library-side seam for the host traversal driver. With no
    /// rules configured the statements are not visited at all and the report
    /// records zero checked statements.
    #[must_use]
    pub fn check_all(&self, statements: &[ImportStatement]) -> CheckReport {
        let mut report = CheckReport::new();
        if self.rules.is_empty() {
            return report;
        }
        for statement in statements {
            report.diagnostics.extend(self.check(statement));
            report.statements_checked += 1;
        }
        report
    }

    /// Applies the exact-path rule table to one statement's extracted names.
    fn check_path(
        &self,
        names: &ExtractedNames,
        statement_location: &Location,
    ) -> Vec<Diagnostic> {
        let rule = match self.rules.path_rule(names.source()) {
            Some(r) => r,
            None => return Vec::new(),
        };

        let restricted = match rule.restricted_names() {
            Some(list) => list,
            // No name scoping: the whole module is restricted.
            None => {
                return vec![Diagnostic::path_whole(
                    statement_location.clone(),
                    names.source(),
                    rule.message(),
                )];
            }
        };

        let mut diagnostics = Vec::new();

        // A namespace import or blanket re-export pulls in every restricted
        // name; one diagnostic at the first `*` occurrence only.
        if let Some(star) = names.first_occurrence(STAR_KEY) {
            diagnostics.push(Diagnostic::everything_restricted(
                star.clone(),
                names.source(),
                restricted.join(", "),
                rule.message(),
            ));
        }

        // One diagnostic per physical occurrence, in encounter order.
        for name in restricted {
            for occurrence in names.occurrences_of(name) {
                diagnostics.push(Diagnostic::name_restricted(
                    occurrence.clone(),
                    names.source(),
                    name.clone(),
                    rule.message(),
                ));
            }
        }

        diagnostics
    }

    /// Applies the ordered pattern rule list to one statement's source.
    ///
    /// Pattern rules restrict the source, not individual names, so the
    /// diagnostic is always statement-level.
    fn check_pattern(&self, source: &str, statement_location: &Location) -> Vec<Diagnostic> {
        if !self.rules.has_pattern_rules() {
            return Vec::new();
        }

        // First matching rule in configuration order wins; no match is a
        // normal, silent outcome.
        match self.rules.first_pattern_match(source) {
            Some(rule) => vec![Diagnostic::pattern_whole(
                statement_location.clone(),
                source,
                rule.message(),
            )],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Specifier;
    use crate::types::DiagnosticKind;
    use serde_json::json;

    fn engine(config: serde_json::Value) -> ImportRuleEngine {
        ImportRuleEngine::new(RuleSet::from_value(&config).expect("config should build"))
    }

    fn named_import(source: &str, names: &[&str]) -> ImportStatement {
        let mut stmt = ImportStatement::import(source, Location::new(1, 1));
        for (i, name) in names.iter().enumerate() {
            stmt = stmt.with_specifier(Specifier::named(*name, Location::new(1, 10 + 4 * i)));
        }
        stmt
    }

    // --- empty configuration ---

    #[test]
    fn empty_rules_produce_no_work() {
        let engine = engine(json!([]));
        assert!(engine.is_noop());
        assert!(engine.check(&named_import("fs", &["readFile"])).is_empty());

        let report = engine.check_all(&[named_import("fs", &["readFile"])]);
        assert!(!report.has_violations());
        assert_eq!(report.statements_checked, 0);
    }

    // --- exact-path rules, whole module ---

    #[test]
    fn whole_module_rule_fires_once_regardless_of_specifiers() {
        let engine = engine(json!(["fs"]));
        let diagnostics = engine.check(&named_import("fs", &["readFile", "writeFile"]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::PathWhole);
        assert_eq!(diagnostics[0].location, Location::new(1, 1));
    }

    #[test]
    fn whole_module_rule_with_custom_message() {
        let engine = engine(json!([{ "name": "fs", "message": "Use the facade." }]));
        let diagnostics = engine.check(&named_import("fs", &["readFile"]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::PathWholeCustom);
        assert_eq!(
            diagnostics[0].message(),
            "'fs' import is restricted from being used. Use the facade."
        );
    }

    #[test]
    fn unmatched_source_is_silent() {
        let engine = engine(json!(["fs"]));
        assert!(engine.check(&named_import("path", &["join"])).is_empty());
    }

    #[test]
    fn statement_source_is_trimmed_before_lookup() {
        let engine = engine(json!(["fs"]));
        let diagnostics = engine.check(&named_import("  fs ", &["readFile"]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].import_source, "fs");
    }

    // --- exact-path rules, name-scoped ---

    #[test]
    fn scoped_rule_ignores_unrestricted_names() {
        let engine = engine(json!([{ "name": "mod", "importNames": ["x"] }]));
        assert!(engine.check(&named_import("mod", &["y"])).is_empty());
    }

    #[test]
    fn scoped_rule_emits_per_occurrence_in_encounter_order() {
        let engine = engine(json!([{ "name": "mod", "importNames": ["x"] }]));
        let stmt = ImportStatement::import("mod", Location::new(1, 1))
            .with_specifier(Specifier::named("x", Location::new(1, 10)))
            .with_specifier(Specifier::named("y", Location::new(1, 14)))
            .with_specifier(Specifier::named("x", Location::new(1, 18)));
        let diagnostics = engine.check(&stmt);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::NameRestricted);
        assert_eq!(diagnostics[0].location, Location::new(1, 10));
        assert_eq!(diagnostics[1].location, Location::new(1, 18));
    }

    #[test]
    fn scoped_rule_matches_default_binding_key() {
        let engine = engine(json!([{ "name": "mod", "importNames": ["default"] }]));
        let stmt = ImportStatement::import("mod", Location::new(1, 1))
            .with_specifier(Specifier::default_binding("anything", Location::new(1, 8)));
        let diagnostics = engine.check(&stmt);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].import_name.as_deref(), Some("default"));
        assert_eq!(diagnostics[0].location, Location::new(1, 8));
    }

    #[test]
    fn namespace_import_of_scoped_rule_restricts_everything() {
        let engine = engine(json!([{ "name": "mod", "importNames": ["x", "y"] }]));
        let stmt = ImportStatement::import("mod", Location::new(1, 1))
            .with_specifier(Specifier::namespace("ns", Location::new(1, 8)));
        let diagnostics = engine.check(&stmt);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EverythingRestricted);
        assert_eq!(diagnostics[0].location, Location::new(1, 8));
        assert_eq!(
            diagnostics[0].message(),
            "* import is invalid because 'x, y' from 'mod' is restricted."
        );
    }

    #[test]
    fn reexport_all_of_scoped_rule_restricts_everything_at_star_token() {
        let engine = engine(json!([{ "name": "mod", "importNames": ["x"] }]));
        let stmt = ImportStatement::reexport_all("mod", Location::new(4, 1))
            .with_star_location(Location::new(4, 8));
        let diagnostics = engine.check(&stmt);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EverythingRestricted);
        assert_eq!(diagnostics[0].location, Location::new(4, 8));
    }

    #[test]
    fn namespace_and_named_specifiers_both_fire() {
        let engine = engine(json!([{ "name": "mod", "importNames": ["x"] }]));
        let stmt = ImportStatement::import("mod", Location::new(1, 1))
            .with_specifier(Specifier::namespace("ns", Location::new(1, 8)))
            .with_specifier(Specifier::named("x", Location::new(1, 20)));
        let diagnostics = engine.check(&stmt);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::EverythingRestricted);
        assert_eq!(diagnostics[1].kind, DiagnosticKind::NameRestricted);
    }

    // --- pattern rules ---

    #[test]
    fn first_matching_pattern_wins() {
        let engine = engine(json!({
            "patterns": ["foo/*", { "pattern": "foo/bar", "message": "use baz" }]
        }));
        let diagnostics = engine.check(&named_import("foo/bar", &["x"]));
        assert_eq!(diagnostics.len(), 1);
        // `foo/*` is configured first and also matches; its (message-less)
        // diagnostic wins over the later, more specific rule.
        assert_eq!(diagnostics[0].kind, DiagnosticKind::PatternWhole);
        assert_eq!(
            diagnostics[0].message(),
            "'foo/bar' import is restricted from being used by a pattern."
        );
    }

    #[test]
    fn pattern_diagnostic_is_statement_level() {
        let engine = engine(json!({ "patterns": ["lodash/*"] }));
        let stmt = ImportStatement::import("lodash/map", Location::new(7, 1))
            .with_specifier(Specifier::default_binding("map", Location::new(7, 8)))
            .with_specifier(Specifier::named("curry", Location::new(7, 13)));
        let diagnostics = engine.check(&stmt);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location, Location::new(7, 1));
    }

    #[test]
    fn unmatched_pattern_is_silent() {
        let engine = engine(json!({ "patterns": ["foo/*"] }));
        assert!(engine.check(&named_import("bar/baz", &["x"])).is_empty());
    }

    #[test]
    fn pattern_with_custom_message() {
        let engine = engine(json!({
            "patterns": [{ "pattern": "internal/**", "message": "Private modules." }]
        }));
        let diagnostics = engine.check(&named_import("internal/secrets/keys", &["k"]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::PatternWholeCustom);
        assert_eq!(
            diagnostics[0].message(),
            "'internal/secrets/keys' import is restricted from being used by a pattern. \
             Private modules."
        );
    }

    // --- family independence ---

    #[test]
    fn path_and_pattern_rules_both_fire_on_one_statement() {
        let engine = engine(json!({
            "paths": ["foo/bar"],
            "patterns": ["foo/*"]
        }));
        let diagnostics = engine.check(&named_import("foo/bar", &["x"]));
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::PathWhole);
        assert_eq!(diagnostics[1].kind, DiagnosticKind::PatternWhole);
    }

    // --- check_all ---

    #[test]
    fn check_all_preserves_source_order() {
        let engine = engine(json!(["fs", "cluster"]));
        let statements = vec![
            named_import("cluster", &["fork"]),
            named_import("path", &["join"]),
            named_import("fs", &["readFile"]),
        ];
        let report = engine.check_all(&statements);
        assert_eq!(report.statements_checked, 3);
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.diagnostics[0].import_source, "cluster");
        assert_eq!(report.diagnostics[1].import_source, "fs");
    }
}
