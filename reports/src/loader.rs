//! Loading schema definitions from JSON and YAML files.
//!
//! Callers hand the CLI files and/or directories; [`collect_definition_paths`]
//! expands them to a sorted list of definition files and
//! [`load_definitions`] parses each into a
//! [`SchemaDefinition`](payload_schema_core::SchemaDefinition) by extension.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use payload_schema_core::SchemaDefinition;

use crate::error::{Result, StorageError};

fn is_definition_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("json" | "yaml" | "yml")
    )
}

/// Expands files and directories to individual definition file paths.
///
/// Directories are scanned one level deep for `*.json`, `*.yaml`, and
/// `*.yml` files. The result is sorted for deterministic input order.
///
/// # Errors
///
/// Returns [`StorageError::IoError`] if a directory cannot be read, or
/// [`StorageError::UnsupportedFile`] when an explicitly named file has an
/// extension the loader does not handle.
pub fn collect_definition_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in std::fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && is_definition_file(&path) {
                    paths.push(path);
                }
            }
        } else if is_definition_file(input) {
            paths.push(input.clone());
        } else {
            return Err(StorageError::UnsupportedFile(input.clone()));
        }
    }
    paths.sort();
    Ok(paths)
}

/// Parses each path into a [`SchemaDefinition`], preserving input order.
///
/// # Errors
///
/// Returns [`StorageError::IoError`] if a file cannot be opened,
/// [`StorageError::JsonError`] / [`StorageError::YamlError`] on malformed
/// content, or [`StorageError::UnsupportedFile`] for an unhandled extension.
pub fn load_definitions(paths: &[PathBuf]) -> Result<Vec<SchemaDefinition>> {
    let mut definitions = Vec::with_capacity(paths.len());
    for path in paths {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let definition = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_reader(reader)?,
            Some("yaml" | "yml") => serde_yaml::from_reader(reader)?,
            _ => return Err(StorageError::UnsupportedFile(path.clone())),
        };
        definitions.push(definition);
    }
    Ok(definitions)
}
