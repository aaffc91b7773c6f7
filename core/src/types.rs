//! Schema type definitions for payload reconciliation.
//!
//! This module defines the data model used to describe payload fields and
//! the outcome of a merge. The types are designed for serialization with
//! [`serde`] and can round-trip through JSON and YAML definition files.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a payload field.
///
/// Optionality is represented by an explicit [`Nullable`](Self::Nullable)
/// wrapper rather than a union-with-null, which keeps normalization and
/// equality checks simple. A [`Union`](Self::Union) of non-null members is a
/// base type of its own for comparison purposes.
///
/// # Examples
///
/// ```
/// use payload_schema_core::TypeDescriptor;
///
/// let email = TypeDescriptor::nullable(TypeDescriptor::named("string"));
/// let (base, was_optional) = email.normalize();
/// assert_eq!(base, TypeDescriptor::named("string"));
/// assert!(was_optional);
///
/// // Display unwraps nullable and joins unions with " or "
/// assert_eq!(email.to_string(), "string");
/// let id = TypeDescriptor::union(vec![
///     TypeDescriptor::named("integer"),
///     TypeDescriptor::named("string"),
/// ]);
/// assert_eq!(id.to_string(), "integer or string");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// A primitive or named type (e.g. `"string"`, `"integer"`).
    Named(String),
    /// A type that may also be null.
    Nullable(Box<TypeDescriptor>),
    /// A multi-member union of named types.
    Union(Vec<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Creates a named type descriptor.
    pub fn named(name: &str) -> Self {
        Self::Named(name.to_string())
    }

    /// Wraps a descriptor in a nullable wrapper.
    pub fn nullable(inner: TypeDescriptor) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Creates a union of the given members.
    pub fn union(members: Vec<TypeDescriptor>) -> Self {
        Self::Union(members)
    }

    /// Unwraps nullable wrappers to the base type.
    ///
    /// Returns the base type together with a flag recording whether any
    /// wrapper was removed. Unions are preserved as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use payload_schema_core::TypeDescriptor;
    ///
    /// let plain = TypeDescriptor::named("integer");
    /// assert_eq!(plain.normalize(), (plain.clone(), false));
    ///
    /// let wrapped = TypeDescriptor::nullable(TypeDescriptor::named("integer"));
    /// assert_eq!(wrapped.normalize(), (plain, true));
    /// ```
    pub fn normalize(&self) -> (TypeDescriptor, bool) {
        let mut base = self;
        let mut was_optional = false;
        while let TypeDescriptor::Nullable(inner) = base {
            base = inner;
            was_optional = true;
        }
        (base.clone(), was_optional)
    }

    /// Returns `true` if this descriptor is a nullable wrapper.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }
}

/// Strips qualification prefixes from a type name (`foo::Bar` → `Bar`,
/// `module.Type` → `Type`).
fn strip_qualifier(name: &str) -> &str {
    let tail = name.rsplit("::").next().unwrap_or(name);
    tail.rsplit('.').next().unwrap_or(tail)
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(strip_qualifier(name)),
            Self::Nullable(inner) => inner.fmt(f),
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    member.fmt(f)?;
                }
                Ok(())
            }
        }
    }
}

/// Default value declared for a field.
///
/// [`Required`](Self::Required) is the explicit no-default marker and is
/// distinct from a declared default of null.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDefault {
    /// No default; a value must always be supplied.
    #[default]
    Required,
    /// Defaults to null.
    Null,
    /// Defaults to a concrete JSON value.
    Value(serde_json::Value),
}

/// A field declared through the modern protocol: explicit `required` flag,
/// independent default and metadata.
///
/// # Examples
///
/// ```
/// use payload_schema_core::{FieldDecl, FieldDefault, TypeDescriptor};
///
/// let name = FieldDecl::required("first_name", TypeDescriptor::named("string"));
/// assert!(name.required);
///
/// let phone = FieldDecl::optional(
///     "phone",
///     TypeDescriptor::nullable(TypeDescriptor::named("string")),
///     FieldDefault::Null,
/// );
/// assert!(!phone.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Whether a value must be supplied.
    pub required: bool,
    /// Declared default.
    #[serde(default)]
    pub default: FieldDefault,
    /// Ordered key→value metadata pairs.
    #[serde(default)]
    pub metadata: Vec<(String, serde_json::Value)>,
}

impl FieldDecl {
    /// Creates a required field with no default.
    pub fn required(name: &str, ty: TypeDescriptor) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required: true,
            default: FieldDefault::Required,
            metadata: Vec::new(),
        }
    }

    /// Creates an optional field with the given default.
    pub fn optional(name: &str, ty: TypeDescriptor, default: FieldDefault) -> Self {
        Self {
            name: name.to_string(),
            ty,
            required: false,
            default,
            metadata: Vec::new(),
        }
    }

    /// Appends a metadata pair.
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.push((key.to_string(), value));
        self
    }
}

/// A field declared through the legacy protocol: requiredness is inferred
/// from default presence (no default means required).
///
/// # Examples
///
/// ```
/// use payload_schema_core::{FieldDefault, LegacyFieldDecl, TypeDescriptor};
///
/// let age = LegacyFieldDecl::new("age", TypeDescriptor::named("integer"));
/// assert_eq!(age.default, FieldDefault::Required);
///
/// let nick = LegacyFieldDecl::new("nick", TypeDescriptor::named("string"))
///     .with_default(FieldDefault::Null);
/// assert_eq!(nick.default, FieldDefault::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyFieldDecl {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Declared default; [`FieldDefault::Required`] when absent.
    #[serde(default)]
    pub default: FieldDefault,
    /// Ordered key→value metadata pairs.
    #[serde(default)]
    pub metadata: Vec<(String, serde_json::Value)>,
}

impl LegacyFieldDecl {
    /// Creates a legacy field with no default (and therefore required).
    pub fn new(name: &str, ty: TypeDescriptor) -> Self {
        Self {
            name: name.to_string(),
            ty,
            default: FieldDefault::Required,
            metadata: Vec::new(),
        }
    }

    /// Sets the declared default, making the field optional.
    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }

    /// Appends a metadata pair.
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.push((key.to_string(), value));
        self
    }
}

/// The declaration protocol a schema uses.
///
/// The extractor supports the modern and legacy protocols without any
/// caller-visible difference downstream. An [`Opaque`](Self::Opaque) shape is
/// a declaration style the extractor does not recognize; it is a hard
/// extraction failure, never a silent omission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldDeclarations {
    /// Modern protocol with explicit required flags.
    #[serde(rename = "fields")]
    Fields(Vec<FieldDecl>),
    /// Legacy protocol where requiredness follows default presence.
    #[serde(rename = "legacy_fields")]
    Legacy(Vec<LegacyFieldDecl>),
    /// An unrecognized declaration shape.
    #[serde(rename = "opaque")]
    Opaque(serde_json::Value),
}

/// An immutable, externally supplied named set of field declarations.
///
/// Sub schemas and spec schemas share this representation; whether a schema
/// is a spec is decided by which argument it is passed in, not by anything
/// on the definition itself.
///
/// # Examples
///
/// ```
/// use payload_schema_core::{FieldDecl, SchemaDefinition, TypeDescriptor};
///
/// let schema = SchemaDefinition::new(
///     "UserNamePayload",
///     vec![FieldDecl::required("first_name", TypeDescriptor::named("string"))],
/// );
/// assert_eq!(schema.name, "UserNamePayload");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Schema name; used as the source name in findings and reports.
    pub name: String,
    /// The field declarations, in declaration order.
    #[serde(flatten)]
    pub declarations: FieldDeclarations,
}

impl SchemaDefinition {
    /// Creates a definition using the modern declaration protocol.
    pub fn new(name: &str, fields: Vec<FieldDecl>) -> Self {
        Self {
            name: name.to_string(),
            declarations: FieldDeclarations::Fields(fields),
        }
    }

    /// Creates a definition using the legacy declaration protocol.
    pub fn legacy(name: &str, fields: Vec<LegacyFieldDecl>) -> Self {
        Self {
            name: name.to_string(),
            declarations: FieldDeclarations::Legacy(fields),
        }
    }

    /// Creates a definition with an unrecognized declaration shape.
    pub fn opaque(name: &str, payload: serde_json::Value) -> Self {
        Self {
            name: name.to_string(),
            declarations: FieldDeclarations::Opaque(payload),
        }
    }
}

/// One field as extracted from one schema.
///
/// Produced by [`extract_fields`](crate::extract_fields); the rest of the
/// pipeline operates only on these facts, never on declaration protocols.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFact {
    /// Field name.
    pub name: String,
    /// Declared type (not yet normalized).
    pub ty: TypeDescriptor,
    /// Whether the declaring schema requires the field.
    pub required: bool,
    /// Declared default.
    pub default: FieldDefault,
    /// Ordered key→value metadata pairs.
    pub metadata: Vec<(String, serde_json::Value)>,
    /// Name of the declaring schema.
    pub source: String,
}

/// The kind of irreconcilable disagreement found on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictIssue {
    /// Two sources declared structurally different base types.
    TypeMismatch,
    /// A spec schema requires the field but a non-spec source may omit it.
    SpecViolation,
}

impl fmt::Display for ConflictIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch => f.write_str("type_mismatch"),
            Self::SpecViolation => f.write_str("spec_violation"),
        }
    }
}

/// Snapshot of one source's declaration of a conflicted field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSource {
    /// Display form of the declared type.
    pub field_type: String,
    /// Whether that source requires the field.
    pub required: bool,
}

/// A structured record of an irreconcilable disagreement on one field.
///
/// The `sources` map covers *every* schema contributing the field, not just
/// the offending ones.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use payload_schema_core::{ConflictFinding, ConflictIssue, ConflictSource};
///
/// let mut sources = BTreeMap::new();
/// sources.insert("Sub1".to_string(), ConflictSource {
///     field_type: "integer".to_string(),
///     required: true,
/// });
/// let finding = ConflictFinding {
///     field_name: "age".to_string(),
///     issue: ConflictIssue::TypeMismatch,
///     sources,
/// };
/// assert_eq!(
///     finding.to_string(),
///     "type_mismatch on 'age': {Sub1: integer (required)}",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictFinding {
    /// The conflicted field.
    pub field_name: String,
    /// Classification of the conflict.
    pub issue: ConflictIssue,
    /// Per-source snapshot for every contributing schema.
    pub sources: BTreeMap<String, ConflictSource>,
}

impl fmt::Display for ConflictFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on '{}': {{", self.issue, self.field_name)?;
        for (i, (source, entry)) in self.sources.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let flag = if entry.required { "required" } else { "optional" };
            write!(f, "{}: {} ({})", source, entry.field_type, flag)?;
        }
        f.write_str("}")
    }
}

/// A reconciled field in the core schema.
///
/// Produced only for fields with zero findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreField {
    /// Field name.
    pub name: String,
    /// Resolved base type; optionality is carried by `optional`, never by a
    /// nullable wrapper added during resolution.
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    /// Whether the field may be omitted in the core schema.
    pub optional: bool,
    /// Default taken from the chosen contribution.
    pub default: FieldDefault,
    /// Metadata taken from the chosen contribution.
    pub metadata: Vec<(String, serde_json::Value)>,
}

/// The canonical schema reconciled from all sub and spec schemas.
///
/// Fields appear in first-seen order across all inputs (sub schemas in input
/// order, then spec schemas in input order).
///
/// # Examples
///
/// ```
/// use payload_schema_core::*;
///
/// let sub = SchemaDefinition::new(
///     "UserNamePayload",
///     vec![FieldDecl::required("first_name", TypeDescriptor::named("string"))],
/// );
/// let core = merge_schemas(&[sub], &[], "CorePayload", "core_payload").unwrap();
/// assert_eq!(core.name, "CorePayload");
/// assert_eq!(core.field_names(), vec!["first_name"]);
/// assert!(core.get("first_name").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreSchema {
    /// Caller-supplied schema identifier.
    pub name: String,
    /// Caller-supplied storage-table identifier (pass-through only).
    pub table_name: String,
    /// Reconciled fields in first-seen order.
    pub fields: Vec<CoreField>,
}

impl CoreSchema {
    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&CoreField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns all field names in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }
}
