//! Field extraction and aggregation.
//!
//! Extraction converts a [`SchemaDefinition`] into an ordered list of
//! [`FieldFact`]s regardless of which declaration protocol it uses.
//! Aggregation then groups facts by field name across all inputs, sub
//! schemas first, preserving both contribution order and first-seen field
//! order.

use std::collections::HashMap;

use crate::error::{MergeError, Result};
use crate::types::{FieldDeclarations, FieldDefault, FieldFact, SchemaDefinition};

/// Extracts the field facts declared by one schema.
///
/// Both declaration protocols yield identical facts downstream; the legacy
/// protocol infers `required` from default presence. An opaque declaration
/// shape is a hard failure with no partial extraction.
///
/// # Errors
///
/// Returns [`MergeError::UnsupportedSchemaKind`] when the schema's
/// declaration shape cannot be interpreted.
///
/// # Examples
///
/// ```
/// use payload_schema_core::*;
///
/// let schema = SchemaDefinition::legacy(
///     "ContactPayload",
///     vec![
///         LegacyFieldDecl::new("email", TypeDescriptor::named("string")),
///         LegacyFieldDecl::new("phone", TypeDescriptor::named("string"))
///             .with_default(FieldDefault::Null),
///     ],
/// );
/// let facts = extract_fields(&schema).unwrap();
/// assert!(facts[0].required);
/// assert!(!facts[1].required);
/// assert_eq!(facts[1].source, "ContactPayload");
/// ```
pub fn extract_fields(schema: &SchemaDefinition) -> Result<Vec<FieldFact>> {
    match &schema.declarations {
        FieldDeclarations::Fields(decls) => Ok(decls
            .iter()
            .map(|decl| FieldFact {
                name: decl.name.clone(),
                ty: decl.ty.clone(),
                required: decl.required,
                default: decl.default.clone(),
                metadata: decl.metadata.clone(),
                source: schema.name.clone(),
            })
            .collect()),
        FieldDeclarations::Legacy(decls) => Ok(decls
            .iter()
            .map(|decl| FieldFact {
                name: decl.name.clone(),
                ty: decl.ty.clone(),
                required: matches!(decl.default, FieldDefault::Required),
                default: decl.default.clone(),
                metadata: decl.metadata.clone(),
                source: schema.name.clone(),
            })
            .collect()),
        FieldDeclarations::Opaque(_) => Err(MergeError::UnsupportedSchemaKind {
            schema: schema.name.clone(),
        }),
    }
}

/// Per-field-name collection of all contributing declarations.
///
/// Every aggregate list is non-empty, ordered sub schemas first (in input
/// order) then spec schemas (in input order). Field iteration follows
/// first-seen order across all inputs.
///
/// # Examples
///
/// ```
/// use payload_schema_core::*;
///
/// let sub = SchemaDefinition::new(
///     "Sub",
///     vec![FieldDecl::required("email", TypeDescriptor::named("string"))],
/// );
/// let spec = SchemaDefinition::new(
///     "Spec",
///     vec![FieldDecl::required("email", TypeDescriptor::named("string"))],
/// );
/// let aggregates = FieldAggregates::collect(&[sub], &[spec]).unwrap();
/// let (name, facts) = aggregates.iter().next().unwrap();
/// assert_eq!(name, "email");
/// assert_eq!(facts[0].source, "Sub");
/// assert_eq!(facts[1].source, "Spec");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldAggregates {
    order: Vec<String>,
    by_name: HashMap<String, Vec<FieldFact>>,
}

impl FieldAggregates {
    /// Extracts and groups fields from all sub and spec schemas.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::UnsupportedSchemaKind`] if any input schema
    /// cannot be extracted.
    pub fn collect(subs: &[SchemaDefinition], specs: &[SchemaDefinition]) -> Result<Self> {
        let mut aggregates = Self::default();
        for schema in subs.iter().chain(specs.iter()) {
            for fact in extract_fields(schema)? {
                aggregates.push(fact);
            }
        }
        Ok(aggregates)
    }

    fn push(&mut self, fact: FieldFact) {
        match self.by_name.get_mut(&fact.name) {
            Some(facts) => facts.push(fact),
            None => {
                self.order.push(fact.name.clone());
                self.by_name.insert(fact.name.clone(), vec![fact]);
            }
        }
    }

    /// Iterates over `(field name, contributions)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldFact])> {
        self.order.iter().map(|name| {
            let facts = self
                .by_name
                .get(name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (name.as_str(), facts)
        })
    }

    /// Number of distinct field names.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no fields were aggregated.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDecl, LegacyFieldDecl, TypeDescriptor};

    fn sub(name: &str, fields: Vec<FieldDecl>) -> SchemaDefinition {
        SchemaDefinition::new(name, fields)
    }

    #[test]
    fn test_extract_modern_protocol() {
        let schema = sub(
            "Sub",
            vec![
                FieldDecl::required("a", TypeDescriptor::named("string")),
                FieldDecl::optional("b", TypeDescriptor::named("integer"), FieldDefault::Null),
            ],
        );
        let facts = extract_fields(&schema).unwrap();
        assert_eq!(facts.len(), 2);
        assert!(facts[0].required);
        assert!(!facts[1].required);
        assert_eq!(facts[1].default, FieldDefault::Null);
    }

    #[test]
    fn test_extract_legacy_infers_required_from_default() {
        let schema = SchemaDefinition::legacy(
            "Legacy",
            vec![
                LegacyFieldDecl::new("a", TypeDescriptor::named("string")),
                LegacyFieldDecl::new("b", TypeDescriptor::named("string"))
                    .with_default(FieldDefault::Value(serde_json::json!("x"))),
            ],
        );
        let facts = extract_fields(&schema).unwrap();
        assert!(facts[0].required);
        assert!(!facts[1].required);
    }

    #[test]
    fn test_extract_opaque_fails_fast() {
        let schema = SchemaDefinition::opaque("Weird", serde_json::json!({"shape": 1}));
        let err = extract_fields(&schema).unwrap_err();
        assert_eq!(
            err,
            MergeError::UnsupportedSchemaKind {
                schema: "Weird".to_string()
            }
        );
    }

    #[test]
    fn test_aggregates_preserve_first_seen_and_contribution_order() {
        let sub1 = sub(
            "Sub1",
            vec![FieldDecl::required("x", TypeDescriptor::named("string"))],
        );
        let sub2 = sub(
            "Sub2",
            vec![
                FieldDecl::required("y", TypeDescriptor::named("string")),
                FieldDecl::required("x", TypeDescriptor::named("string")),
            ],
        );
        let spec = sub(
            "Spec",
            vec![FieldDecl::required("x", TypeDescriptor::named("string"))],
        );

        let aggregates = FieldAggregates::collect(&[sub1, sub2], &[spec]).unwrap();
        let names: Vec<&str> = aggregates.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["x", "y"]);

        let (_, x_facts) = aggregates.iter().next().unwrap();
        let sources: Vec<&str> = x_facts.iter().map(|f| f.source.as_str()).collect();
        assert_eq!(sources, vec!["Sub1", "Sub2", "Spec"]);
    }

    #[test]
    fn test_collect_propagates_unsupported_schema() {
        let good = sub(
            "Good",
            vec![FieldDecl::required("a", TypeDescriptor::named("string"))],
        );
        let bad = SchemaDefinition::opaque("Bad", serde_json::Value::Null);
        let err = FieldAggregates::collect(&[good], &[bad]).unwrap_err();
        assert!(matches!(err, MergeError::UnsupportedSchemaKind { .. }));
    }
}
