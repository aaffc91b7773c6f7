//! Report persistence.
//!
//! Serializes each schema's diagnostic report as pretty-printed JSON to
//! `<output_dir>/<schema name>.json`. Two concurrent merges targeting the
//! same directory with identically named schemas race last-write-wins on
//! that file; the writer makes no stronger guarantee.

use std::collections::BTreeMap;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use payload_schema_core::SchemaReport;

use crate::error::Result;

/// Writes one JSON report file per schema, creating `output_dir` if absent.
///
/// Returns the paths written, in schema-name order.
///
/// # Errors
///
/// Returns [`StorageError::IoError`](crate::StorageError::IoError) if the
/// directory or a file cannot be created, or
/// [`StorageError::JsonError`](crate::StorageError::JsonError) if
/// serialization fails. Failures propagate unmodified; nothing is retried.
///
/// # Examples
///
/// ```no_run
/// use payload_schema_core::*;
/// use payload_schema_reports::write_reports;
///
/// let sub = SchemaDefinition::new(
///     "ContactPayload",
///     vec![FieldDecl::required("email", TypeDescriptor::named("string"))],
/// );
/// let reports = generate_reports(&[sub], &[]).unwrap();
/// let written = write_reports(&reports, "reports/").unwrap();
/// assert_eq!(written.len(), 1);
/// ```
pub fn write_reports(
    reports: &BTreeMap<String, SchemaReport>,
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(reports.len());
    for (name, report) in reports {
        let path = output_dir.join(format!("{name}.json"));
        let file = std::fs::File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;
        written.push(path);
    }
    Ok(written)
}
