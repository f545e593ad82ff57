//! Configuration ingestion (DTO layer and rule-table construction).
//!
//! Raw configuration arrives from the host as a JSON-shaped value in one of
//! two accepted shapes: a flat list of path rules, or a single
//! `{paths, patterns}` object (also accepted as the sole element of a
//! one-element list). The shape is resolved exactly once, at table-build
//! time, into a tagged [`ConfigShape`]; per-statement checking never sees the
//! raw configuration.
//!
//! All validation happens here: a malformed shape, unknown key, empty name or
//! message, or invalid pattern fails the session before any statement is
//! checked.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::matcher::{PatternError, SourcePattern};
use crate::rules::{PathRule, PatternRule, RuleSet};

/// Errors raised while building rule tables from configuration.
///
/// These abort the whole analysis session; they are never per-statement
/// diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration is neither a rule list nor a grouped object.
    #[error("configuration must be a rule list or a single {{paths, patterns}} object")]
    MalformedShape,

    /// A grouped object was followed by further configuration elements.
    #[error(
        "a {{paths, patterns}} object must be the only configuration element \
         ({extra} extra element(s) found)"
    )]
    TrailingElements {
        /// How many elements followed the grouped object.
        extra: usize,
    },

    /// Configuration did not deserialize (wrong types, unknown keys).
    #[error("failed to parse configuration: {message}")]
    Parse {
        /// Deserialization error detail.
        message: String,
    },

    /// A restricted source name is empty.
    #[error("restricted source name must not be empty")]
    EmptySourceName,

    /// A configured message is empty.
    #[error("message for `{context}` must not be empty")]
    EmptyMessage {
        /// The rule the message belongs to.
        context: String,
    },

    /// `importNames` is present but lists no names.
    #[error("importNames for `{name}` must list at least one name")]
    EmptyImportNames {
        /// The rule's source name.
        name: String,
    },

    /// `importNames` contains an empty name.
    #[error("importNames for `{name}` must not contain empty names")]
    BlankImportName {
        /// The rule's source name.
        name: String,
    },

    /// A pattern rule failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// One entry of the flat path-rule list: a bare source name or a detailed
/// rule object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PathEntryDto {
    Source(String),
    Detailed(PathRuleDto),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PathRuleDto {
    name: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    import_names: Option<Vec<String>>,
}

/// One entry of the pattern list: a bare pattern or a detailed rule object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PatternEntryDto {
    Pattern(String),
    Detailed(PatternRuleDto),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct PatternRuleDto {
    pattern: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupedDto {
    #[serde(default)]
    paths: Vec<PathEntryDto>,
    #[serde(default)]
    patterns: Vec<PatternEntryDto>,
}

/// The configuration shape, resolved once at table-build time.
#[derive(Debug)]
enum ConfigShape {
    /// A flat list interpreted entirely as path rules.
    Flat(Vec<PathEntryDto>),
    /// A single `{paths, patterns}` object.
    Grouped(GroupedDto),
}

impl ConfigShape {
    fn detect(value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) if map.contains_key("paths") || map.contains_key("patterns") => {
                Ok(Self::Grouped(parse_value(value)?))
            }
            Value::Array(items) => {
                let grouped_first = matches!(
                    items.first(),
                    Some(Value::Object(first))
                        if first.contains_key("paths") || first.contains_key("patterns")
                );
                if grouped_first {
                    if items.len() > 1 {
                        return Err(ConfigError::TrailingElements {
                            extra: items.len() - 1,
                        });
                    }
                    return Ok(Self::Grouped(parse_value(&items[0])?));
                }
                Ok(Self::Flat(parse_value(value)?))
            }
            _ => Err(ConfigError::MalformedShape),
        }
    }
}

fn parse_value<T: DeserializeOwned>(value: &Value) -> Result<T, ConfigError> {
    serde_json::from_value(value.clone()).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
    })
}

fn validate_message(message: Option<String>, context: &str) -> Result<Option<String>, ConfigError> {
    match message {
        Some(m) if m.trim().is_empty() => Err(ConfigError::EmptyMessage {
            context: context.to_string(),
        }),
        other => Ok(other),
    }
}

impl PathEntryDto {
    fn into_rule(self) -> Result<PathRule, ConfigError> {
        match self {
            Self::Source(source) => {
                if source.trim().is_empty() {
                    return Err(ConfigError::EmptySourceName);
                }
                Ok(PathRule::new(source, None, None))
            }
            Self::Detailed(dto) => {
                if dto.name.trim().is_empty() {
                    return Err(ConfigError::EmptySourceName);
                }
                let message = validate_message(dto.message, &dto.name)?;
                let import_names = match dto.import_names {
                    Some(names) => {
                        if names.is_empty() {
                            return Err(ConfigError::EmptyImportNames { name: dto.name });
                        }
                        if names.iter().any(|n| n.trim().is_empty()) {
                            return Err(ConfigError::BlankImportName { name: dto.name });
                        }
                        // Restricted names form an ordered set: duplicates
                        // keep their first position.
                        let mut deduped = Vec::with_capacity(names.len());
                        for name in names {
                            if !deduped.contains(&name) {
                                deduped.push(name);
                            }
                        }
                        Some(deduped)
                    }
                    None => None,
                };
                Ok(PathRule::new(dto.name, message, import_names))
            }
        }
    }
}

impl PatternEntryDto {
    fn into_rule(self) -> Result<PatternRule, ConfigError> {
        match self {
            Self::Pattern(pattern) => Ok(PatternRule::new(SourcePattern::new(&pattern)?, None)),
            Self::Detailed(dto) => {
                let pattern = SourcePattern::new(&dto.pattern)?;
                let message = validate_message(dto.message, &dto.pattern)?;
                Ok(PatternRule::new(pattern, message))
            }
        }
    }
}

impl RuleSet {
    /// Builds the rule tables from a raw configuration value.
    ///
    /// Accepts a flat path-rule list or a single `{paths, patterns}` object
    /// (bare, or as the sole element of a one-element list). Every pattern is
    /// compiled eagerly. Path rules sharing a `source` overwrite earlier
    /// ones: last write wins.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed shape, unknown keys, empty
    /// names/messages/`importNames`, or an invalid pattern. Errors abort the
    /// session before any statement is checked.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let (path_entries, pattern_entries) = match ConfigShape::detect(value)? {
            ConfigShape::Flat(paths) => (paths, Vec::new()),
            ConfigShape::Grouped(grouped) => (grouped.paths, grouped.patterns),
        };

        let mut path_rules = Vec::with_capacity(path_entries.len());
        for entry in path_entries {
            path_rules.push(entry.into_rule()?);
        }
        let mut pattern_rules = Vec::with_capacity(pattern_entries.len());
        for entry in pattern_entries {
            pattern_rules.push(entry.into_rule()?);
        }

        Ok(Self::from_parts(path_rules, pattern_rules))
    }

    /// Builds the rule tables from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid JSON, or for any of the
    /// [`from_value`](Self::from_value) failure modes.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(raw).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        Self::from_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_list_of_source_names() {
        let rules = RuleSet::from_value(&json!(["fs", "cluster"])).unwrap();
        assert_eq!(rules.path_rule_count(), 2);
        assert_eq!(rules.pattern_rule_count(), 0);
        assert!(rules.path_rule("fs").is_some());
    }

    #[test]
    fn flat_list_with_detailed_rules() {
        let rules = RuleSet::from_value(&json!([
            "cluster",
            {
                "name": "fs",
                "message": "Use the storage facade.",
                "importNames": ["readFile", "writeFile"]
            }
        ]))
        .unwrap();
        let rule = rules.path_rule("fs").unwrap();
        assert_eq!(rule.message(), Some("Use the storage facade."));
        assert_eq!(
            rule.restricted_names(),
            Some(&["readFile".to_string(), "writeFile".to_string()][..])
        );
        assert!(rules.path_rule("cluster").unwrap().restricted_names().is_none());
    }

    #[test]
    fn grouped_object_with_paths_and_patterns() {
        let rules = RuleSet::from_value(&json!({
            "paths": ["fs"],
            "patterns": ["lodash/*", { "pattern": "internal/**", "message": "Private." }]
        }))
        .unwrap();
        assert_eq!(rules.path_rule_count(), 1);
        assert_eq!(rules.pattern_rule_count(), 2);
        let hit = rules.first_pattern_match("internal/secrets").unwrap();
        assert_eq!(hit.message(), Some("Private."));
    }

    #[test]
    fn grouped_object_as_sole_list_element() {
        let rules = RuleSet::from_value(&json!([{ "patterns": ["foo/*"] }])).unwrap();
        assert_eq!(rules.pattern_rule_count(), 1);
        assert_eq!(rules.path_rule_count(), 0);
    }

    #[test]
    fn grouped_object_with_trailing_elements_rejected() {
        let err = RuleSet::from_value(&json!([{ "paths": ["fs"] }, "cluster"])).unwrap_err();
        assert!(matches!(err, ConfigError::TrailingElements { extra: 1 }));
    }

    #[test]
    fn unknown_key_rejected() {
        let err =
            RuleSet::from_value(&json!([{ "name": "fs", "severity": "error" }])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_grouped_key_rejected() {
        let err = RuleSet::from_value(&json!({ "paths": [], "rules": [] })).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_source_name_rejected() {
        let err = RuleSet::from_value(&json!([""])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySourceName));
    }

    #[test]
    fn empty_message_rejected() {
        let err = RuleSet::from_value(&json!([{ "name": "fs", "message": " " }])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyMessage { .. }));
    }

    #[test]
    fn empty_import_names_rejected() {
        let err = RuleSet::from_value(&json!([{ "name": "fs", "importNames": [] }])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyImportNames { .. }));
    }

    #[test]
    fn duplicate_import_names_deduplicated_in_order() {
        let rules =
            RuleSet::from_value(&json!([{ "name": "fs", "importNames": ["b", "a", "b"] }]))
                .unwrap();
        let rule = rules.path_rule("fs").unwrap();
        assert_eq!(
            rule.restricted_names(),
            Some(&["b".to_string(), "a".to_string()][..])
        );
    }

    #[test]
    fn blank_import_name_rejected() {
        let err =
            RuleSet::from_value(&json!([{ "name": "fs", "importNames": ["x", ""] }])).unwrap_err();
        assert!(matches!(err, ConfigError::BlankImportName { .. }));
    }

    #[test]
    fn invalid_pattern_fails_at_build_time() {
        let err = RuleSet::from_value(&json!({ "patterns": ["a["] })).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern(PatternError::Invalid { .. })));
    }

    #[test]
    fn scalar_configuration_rejected() {
        let err = RuleSet::from_value(&json!(42)).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedShape));
    }

    #[test]
    fn bare_object_without_known_keys_rejected() {
        let err = RuleSet::from_value(&json!({ "name": "fs" })).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedShape));
    }

    #[test]
    fn empty_list_builds_empty_tables() {
        let rules = RuleSet::from_value(&json!([])).unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn from_json_str_round_trip() {
        let rules = RuleSet::from_json_str(r#"{"paths": ["fs"], "patterns": ["foo/*"]}"#).unwrap();
        assert_eq!(rules.path_rule_count(), 1);
        assert_eq!(rules.pattern_rule_count(), 1);
        assert!(matches!(
            RuleSet::from_json_str("not json"),
            Err(ConfigError::Parse { .. })
        ));
    }
}
