//! Definition file loading and diagnostic report persistence.
//!
//! This crate is the thin I/O layer around
//! [`payload_schema_core`]: it reads [`SchemaDefinition`]s from JSON/YAML
//! files and writes the per-schema reports produced by
//! [`generate_reports`](payload_schema_core::generate_reports) as
//! pretty-printed JSON, one file per schema.
//!
//! # Example
//!
//! ```no_run
//! use payload_schema_core::generate_reports;
//! use payload_schema_reports::{collect_definition_paths, load_definitions, write_reports};
//!
//! let sub_paths = collect_definition_paths(&["subs/".into()]).unwrap();
//! let subs = load_definitions(&sub_paths).unwrap();
//! let spec_paths = collect_definition_paths(&["specs/".into()]).unwrap();
//! let specs = load_definitions(&spec_paths).unwrap();
//!
//! let reports = generate_reports(&subs, &specs).unwrap();
//! write_reports(&reports, "reports/").unwrap();
//! ```
//!
//! [`SchemaDefinition`]: payload_schema_core::SchemaDefinition

mod error;
mod loader;
mod writer;

pub use error::{Result, StorageError};
pub use loader::{collect_definition_paths, load_definitions};
pub use writer::write_reports;
