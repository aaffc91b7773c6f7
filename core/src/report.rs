//! Per-source diagnostic reports.
//!
//! [`generate_reports`] recombines extraction and conflict analysis into a
//! per-schema view: the fields each schema declares directly, and every
//! finding touching that schema. It runs its own extraction and analysis
//! pass over the inputs and is therefore always computable, whether or not a
//! merge over the same inputs would succeed.
//!
//! # Example
//!
//! ```
//! use payload_schema_core::*;
//!
//! let sub = SchemaDefinition::new(
//!     "ContactPayload",
//!     vec![FieldDecl::optional(
//!         "phone",
//!         TypeDescriptor::nullable(TypeDescriptor::named("string")),
//!         FieldDefault::Null,
//!     )],
//! );
//!
//! let reports = generate_reports(&[sub], &[]).unwrap();
//! let report = &reports["ContactPayload"];
//! assert_eq!(report.definition["phone"].field_type, "string");
//! assert!(report.conflicts.is_empty());
//! ```

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::{FieldAggregates, extract_fields};
use crate::merge::collect_findings;
use crate::types::{ConflictFinding, FieldDefault, SchemaDefinition};

/// One field as declared directly by a single schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    /// Display form of the declared type.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the schema requires the field.
    pub required: bool,
    /// Declared default; both "no default" and an explicit null render as
    /// JSON null.
    pub default: serde_json::Value,
}

/// Diagnostic view of one input schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaReport {
    /// Fields declared directly by this schema, keyed by field name.
    pub definition: BTreeMap<String, FieldSummary>,
    /// Findings whose source map contains this schema's name.
    pub conflicts: Vec<ConflictFinding>,
}

fn render_default(default: &FieldDefault) -> serde_json::Value {
    match default {
        FieldDefault::Required | FieldDefault::Null => serde_json::Value::Null,
        FieldDefault::Value(value) => value.clone(),
    }
}

/// Generates a diagnostic report for every input schema.
///
/// # Errors
///
/// Returns [`MergeError::UnsupportedSchemaKind`](crate::MergeError::UnsupportedSchemaKind)
/// if any input schema cannot be extracted.
///
/// # Examples
///
/// ```
/// use payload_schema_core::*;
///
/// let sub = SchemaDefinition::new(
///     "Contact",
///     vec![FieldDecl::optional(
///         "email",
///         TypeDescriptor::nullable(TypeDescriptor::named("string")),
///         FieldDefault::Null,
///     )],
/// );
/// let spec = SchemaDefinition::new(
///     "Required",
///     vec![FieldDecl::required("email", TypeDescriptor::named("string"))],
/// );
///
/// let reports = generate_reports(&[sub], &[spec]).unwrap();
/// // The violation shows up on both touched schemas.
/// assert_eq!(reports["Contact"].conflicts.len(), 1);
/// assert_eq!(reports["Required"].conflicts.len(), 1);
/// ```
pub fn generate_reports(
    subs: &[SchemaDefinition],
    specs: &[SchemaDefinition],
) -> Result<BTreeMap<String, SchemaReport>> {
    let aggregates = FieldAggregates::collect(subs, specs)?;
    let spec_names: HashSet<&str> = specs.iter().map(|schema| schema.name.as_str()).collect();
    let findings = collect_findings(&aggregates, &spec_names);

    let mut reports = BTreeMap::new();
    for schema in subs.iter().chain(specs.iter()) {
        let mut definition = BTreeMap::new();
        for fact in extract_fields(schema)? {
            definition.insert(
                fact.name.clone(),
                FieldSummary {
                    field_type: fact.ty.to_string(),
                    required: fact.required,
                    default: render_default(&fact.default),
                },
            );
        }
        let conflicts: Vec<ConflictFinding> = findings
            .iter()
            .filter(|finding| finding.sources.contains_key(&schema.name))
            .cloned()
            .collect();
        reports.insert(
            schema.name.clone(),
            SchemaReport {
                definition,
                conflicts,
            },
        );
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_schemas;
    use crate::types::{ConflictIssue, FieldDecl, TypeDescriptor};

    fn named(name: &str) -> TypeDescriptor {
        TypeDescriptor::named(name)
    }

    fn nullable(name: &str) -> TypeDescriptor {
        TypeDescriptor::nullable(TypeDescriptor::named(name))
    }

    #[test]
    fn test_definition_covers_only_directly_declared_fields() {
        let sub = SchemaDefinition::new(
            "Sub",
            vec![FieldDecl::required("a", named("string"))],
        );
        let spec = SchemaDefinition::new(
            "Spec",
            vec![FieldDecl::required("b", named("integer"))],
        );

        let reports = generate_reports(&[sub], &[spec]).unwrap();
        assert_eq!(reports["Sub"].definition.len(), 1);
        assert!(reports["Sub"].definition.contains_key("a"));
        assert!(reports["Spec"].definition.contains_key("b"));
    }

    #[test]
    fn test_definition_renders_display_type_and_default() {
        let sub = SchemaDefinition::new(
            "Sub",
            vec![
                FieldDecl::required("name", named("string")),
                FieldDecl::optional(
                    "limit",
                    named("integer"),
                    FieldDefault::Value(serde_json::json!(10)),
                ),
                FieldDecl::optional("note", nullable("string"), FieldDefault::Null),
            ],
        );

        let reports = generate_reports(&[sub], &[]).unwrap();
        let definition = &reports["Sub"].definition;
        assert_eq!(definition["name"].default, serde_json::Value::Null);
        assert!(definition["name"].required);
        assert_eq!(definition["limit"].default, serde_json::json!(10));
        assert_eq!(definition["note"].field_type, "string");
        assert_eq!(definition["note"].default, serde_json::Value::Null);
    }

    #[test]
    fn test_conflicts_attach_to_every_touched_schema() {
        let sub1 = SchemaDefinition::new(
            "Sub1",
            vec![FieldDecl::required("age", named("integer"))],
        );
        let sub2 = SchemaDefinition::new(
            "Sub2",
            vec![FieldDecl::required("age", named("string"))],
        );
        let spec = SchemaDefinition::new(
            "Spec",
            vec![FieldDecl::required("other", named("string"))],
        );

        let reports = generate_reports(&[sub1, sub2], &[spec]).unwrap();
        assert_eq!(reports["Sub1"].conflicts.len(), 1);
        assert_eq!(reports["Sub1"].conflicts[0].issue, ConflictIssue::TypeMismatch);
        assert_eq!(reports["Sub2"].conflicts.len(), 1);
        assert!(reports["Spec"].conflicts.is_empty());
    }

    #[test]
    fn test_reports_agree_with_merge_outcome() {
        // Clean fields report zero conflicts and appear in the merged core;
        // conflicted fields report at least one and are rejected.
        let sub1 = SchemaDefinition::new(
            "Sub1",
            vec![
                FieldDecl::required("ok", named("string")),
                FieldDecl::required("bad", named("integer")),
            ],
        );
        let sub2 = SchemaDefinition::new(
            "Sub2",
            vec![FieldDecl::required("bad", named("string"))],
        );

        let reports = generate_reports(&[sub1.clone(), sub2.clone()], &[]).unwrap();
        let err = merge_schemas(&[sub1.clone(), sub2.clone()], &[], "Core", "core").unwrap_err();
        let rejected: Vec<&str> = err
            .findings()
            .unwrap()
            .iter()
            .map(|f| f.field_name.as_str())
            .collect();
        assert_eq!(rejected, vec!["bad"]);

        let conflicted_fields: Vec<&str> = reports["Sub1"]
            .conflicts
            .iter()
            .map(|f| f.field_name.as_str())
            .collect();
        assert_eq!(conflicted_fields, vec!["bad"]);

        // Dropping the conflicting source makes both agree on success.
        let reports = generate_reports(&[sub1.clone()], &[]).unwrap();
        assert!(reports["Sub1"].conflicts.is_empty());
        let core = merge_schemas(&[sub1], &[], "Core", "core").unwrap();
        assert_eq!(core.field_names(), vec!["ok", "bad"]);
    }

    #[test]
    fn test_reports_computable_when_merge_would_fail() {
        let sub = SchemaDefinition::new(
            "Sub",
            vec![FieldDecl::optional("email", nullable("string"), FieldDefault::Null)],
        );
        let spec = SchemaDefinition::new(
            "Spec",
            vec![FieldDecl::required("email", named("string"))],
        );

        assert!(merge_schemas(&[sub.clone()], &[spec.clone()], "Core", "core").is_err());
        let reports = generate_reports(&[sub], &[spec]).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports["Sub"].conflicts[0].issue, ConflictIssue::SpecViolation);
    }

    #[test]
    fn test_report_json_shape() {
        let sub = SchemaDefinition::new(
            "Sub",
            vec![FieldDecl::required("name", named("string"))],
        );
        let reports = generate_reports(&[sub], &[]).unwrap();
        let json = serde_json::to_value(&reports["Sub"]).unwrap();
        assert_eq!(json["definition"]["name"]["type"], "string");
        assert_eq!(json["definition"]["name"]["required"], true);
        assert_eq!(json["definition"]["name"]["default"], serde_json::Value::Null);
        assert!(json["conflicts"].as_array().unwrap().is_empty());
    }
}
