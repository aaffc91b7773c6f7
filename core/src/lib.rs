//! Schema-merge and conflict-detection engine for payload definitions.
//!
//! Given several independently-authored field definitions over overlapping
//! data — loosely-constrained *sub* schemas and strictly-constrained *spec*
//! schemas — this crate produces one canonical *core* schema, or refuses and
//! explains exactly why:
//!
//! - [`SchemaDefinition`] — a named, immutable set of field declarations
//!   supplied by a caller through one of two declaration protocols.
//! - [`merge_schemas`] — reconciles types, optionality, defaults, and
//!   metadata into a [`CoreSchema`], aborting with every [`ConflictFinding`]
//!   when any field is irreconcilable.
//! - [`generate_reports`] — per-source diagnostic views, computable whether
//!   or not a merge would succeed.
//!
//! The engine reconciles *type declarations*, not values; it holds no state
//! across calls, so concurrent independent merges are safe.
//!
//! # Example
//!
//! ```
//! use payload_schema_core::*;
//!
//! let names = SchemaDefinition::new(
//!     "UserNamePayload",
//!     vec![
//!         FieldDecl::required("first_name", TypeDescriptor::named("string")),
//!         FieldDecl::required("last_name", TypeDescriptor::named("string")),
//!     ],
//! );
//! let contact = SchemaDefinition::new(
//!     "ContactPayload",
//!     vec![FieldDecl::optional(
//!         "phone",
//!         TypeDescriptor::nullable(TypeDescriptor::named("string")),
//!         FieldDefault::Null,
//!     )],
//! );
//! let spec = SchemaDefinition::new(
//!     "RequiredUserFields",
//!     vec![FieldDecl::required("email", TypeDescriptor::named("string"))],
//! );
//!
//! let core = merge_schemas(&[names, contact], &[spec], "CorePayload", "core_payload").unwrap();
//! assert_eq!(
//!     core.field_names(),
//!     vec!["first_name", "last_name", "phone", "email"],
//! );
//! assert!(core.get("phone").unwrap().optional);
//! assert!(!core.get("email").unwrap().optional);
//! ```

mod error;
mod extract;
mod merge;
mod report;
mod types;

pub use error::{MergeError, Result};
pub use extract::{FieldAggregates, extract_fields};
pub use merge::merge_schemas;
pub use report::{FieldSummary, SchemaReport, generate_reports};
pub use types::*;
