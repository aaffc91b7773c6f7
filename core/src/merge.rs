//! Conflict analysis and core schema construction.
//!
//! [`merge_schemas`] reconciles any number of sub and spec schemas into one
//! [`CoreSchema`], or aborts with the full list of [`ConflictFinding`]s.
//! Detection applies two rules per field: a type mismatch across any two
//! sources, and a spec violation where a spec-required field could be
//! omitted by a non-spec producer. Any finding excludes the field and fails
//! the merge as a whole; a partial core schema is never returned.
//!
//! # Example
//!
//! ```
//! use payload_schema_core::*;
//!
//! let sub = SchemaDefinition::new(
//!     "UserNamePayload",
//!     vec![FieldDecl::required("first_name", TypeDescriptor::named("string"))],
//! );
//! let spec = SchemaDefinition::new(
//!     "RequiredUserFields",
//!     vec![FieldDecl::required("email", TypeDescriptor::named("string"))],
//! );
//!
//! let core = merge_schemas(&[sub], &[spec], "CorePayload", "core_payload").unwrap();
//! assert_eq!(core.field_names(), vec!["first_name", "email"]);
//! assert!(!core.get("email").unwrap().optional);
//! ```

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::error::{MergeError, Result};
use crate::extract::FieldAggregates;
use crate::types::{
    ConflictFinding, ConflictIssue, ConflictSource, CoreField, CoreSchema, FieldDefault,
    FieldFact, SchemaDefinition, TypeDescriptor,
};

/// Outcome of analyzing one field's contributions.
pub(crate) struct FieldAnalysis {
    /// The conflict flagged on this field, if any.
    pub finding: Option<ConflictFinding>,
    /// Whether any spec schema requires the field.
    pub spec_requires: bool,
    /// Non-spec sources that declared the field optional.
    pub optional_subs: Vec<String>,
}

/// Snapshot of every contributing source, attached to findings verbatim.
fn snapshot(facts: &[FieldFact]) -> BTreeMap<String, ConflictSource> {
    facts
        .iter()
        .map(|fact| {
            (
                fact.source.clone(),
                ConflictSource {
                    field_type: fact.ty.to_string(),
                    required: fact.required,
                },
            )
        })
        .collect()
}

/// Applies both conflict rules to one field's normalized contributions.
pub(crate) fn analyze_field(
    name: &str,
    facts: &[FieldFact],
    spec_names: &HashSet<&str>,
) -> FieldAnalysis {
    let normalized: Vec<(TypeDescriptor, bool)> =
        facts.iter().map(|fact| fact.ty.normalize()).collect();

    let spec_requires = facts
        .iter()
        .any(|fact| fact.required && spec_names.contains(fact.source.as_str()));
    let optional_subs: Vec<String> = facts
        .iter()
        .zip(normalized.iter())
        .filter(|(fact, (_, was_optional))| {
            *was_optional && !spec_names.contains(fact.source.as_str())
        })
        .map(|(fact, _)| fact.source.clone())
        .collect();

    // Type mismatch across any two sources, spec status irrelevant.
    let distinct: HashSet<&TypeDescriptor> = normalized.iter().map(|(base, _)| base).collect();
    if distinct.len() > 1 {
        debug!(field = name, sources = facts.len(), "type mismatch");
        return FieldAnalysis {
            finding: Some(ConflictFinding {
                field_name: name.to_string(),
                issue: ConflictIssue::TypeMismatch,
                sources: snapshot(facts),
            }),
            spec_requires,
            optional_subs,
        };
    }

    // A spec-required field must not be satisfiable by a producer that may
    // omit it.
    if spec_requires && !optional_subs.is_empty() {
        debug!(field = name, "spec violation");
        return FieldAnalysis {
            finding: Some(ConflictFinding {
                field_name: name.to_string(),
                issue: ConflictIssue::SpecViolation,
                sources: snapshot(facts),
            }),
            spec_requires,
            optional_subs,
        };
    }

    FieldAnalysis {
        finding: None,
        spec_requires,
        optional_subs,
    }
}

/// Runs conflict analysis over every aggregated field.
pub(crate) fn collect_findings(
    aggregates: &FieldAggregates,
    spec_names: &HashSet<&str>,
) -> Vec<ConflictFinding> {
    aggregates
        .iter()
        .filter_map(|(name, facts)| analyze_field(name, facts, spec_names).finding)
        .collect()
}

/// Merges sub and spec schemas into one canonical core schema.
///
/// `core_name` and `table_name` are pass-through configuration and play no
/// part in reconciliation.
///
/// # Errors
///
/// Returns [`MergeError::UnsupportedSchemaKind`] when an input schema cannot
/// be extracted, or [`MergeError::Conflicts`] carrying every finding when one
/// or more fields are irreconcilable. No partial schema is ever produced.
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
/// let err = merge_schemas(&[sub], &[spec], "Core", "core").unwrap_err();
/// let findings = err.findings().unwrap();
/// assert_eq!(findings[0].issue, ConflictIssue::SpecViolation);
/// ```
pub fn merge_schemas(
    subs: &[SchemaDefinition],
    specs: &[SchemaDefinition],
    core_name: &str,
    table_name: &str,
) -> Result<CoreSchema> {
    let aggregates = FieldAggregates::collect(subs, specs)?;
    let spec_names: HashSet<&str> = specs.iter().map(|schema| schema.name.as_str()).collect();
    debug!(
        fields = aggregates.len(),
        subs = subs.len(),
        specs = specs.len(),
        "aggregated contributions"
    );

    let mut findings = Vec::new();
    let mut fields = Vec::new();

    for (name, facts) in aggregates.iter() {
        let analysis = analyze_field(name, facts, &spec_names);
        if let Some(finding) = analysis.finding {
            findings.push(finding);
            continue;
        }
        fields.push(build_core_field(name, facts, &spec_names, &analysis));
    }

    if !findings.is_empty() {
        warn!(conflicts = findings.len(), "merge aborted");
        return Err(MergeError::Conflicts(findings));
    }

    debug!(core = core_name, fields = fields.len(), "core schema built");
    Ok(CoreSchema {
        name: core_name.to_string(),
        table_name: table_name.to_string(),
        fields,
    })
}

/// Derives the final type, optionality, default, and metadata for a
/// conflict-free field.
fn build_core_field(
    name: &str,
    facts: &[FieldFact],
    spec_names: &HashSet<&str>,
    analysis: &FieldAnalysis,
) -> CoreField {
    // Optional only when some non-spec source declared it optional and no
    // spec schema demands it.
    let optional = !analysis.optional_subs.is_empty() && !analysis.spec_requires;

    // The first contribution fixes the type. When the field resolves
    // optional, its nullable wrapper is dropped; optionality is carried by
    // the flag, never re-wrapped.
    let first = &facts[0];
    let ty = if optional && first.ty.is_nullable() {
        first.ty.normalize().0
    } else {
        first.ty.clone()
    };

    // Default and metadata come from the first spec contribution, or the
    // very first contribution when no spec declares the field. Metadata from
    // other sources is not merged.
    let chosen = facts
        .iter()
        .find(|fact| spec_names.contains(fact.source.as_str()))
        .unwrap_or(first);
    let default = if chosen.required {
        FieldDefault::Required
    } else {
        chosen.default.clone()
    };

    CoreField {
        name: name.to_string(),
        ty,
        optional,
        default,
        metadata: chosen.metadata.clone(),
    }
}
