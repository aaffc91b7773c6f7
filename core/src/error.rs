//! Error types for schema extraction and merging.
//!
//! Every failure is a deterministic function of the input schemas: there is
//! no retry anywhere in this crate and nothing is logged-and-continued.

use thiserror::Error;

use crate::types::ConflictFinding;

/// Errors that can occur while extracting or merging schemas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    /// An input schema uses a declaration shape the extractor does not
    /// recognize. Extraction fails fast; no fields from that schema are
    /// silently dropped.
    #[error("unsupported schema declaration shape in '{schema}'")]
    UnsupportedSchemaKind {
        /// Name of the offending schema.
        schema: String,
    },

    /// One or more conflicts were detected; no partial core schema is built.
    #[error("{}", format_conflicts(.0))]
    Conflicts(Vec<ConflictFinding>),
}

impl MergeError {
    /// Returns the findings carried by a [`Conflicts`](Self::Conflicts)
    /// error, if any.
    pub fn findings(&self) -> Option<&[ConflictFinding]> {
        match self {
            Self::Conflicts(findings) => Some(findings),
            Self::UnsupportedSchemaKind { .. } => None,
        }
    }
}

/// Formats the abort message: one line per finding.
fn format_conflicts(findings: &[ConflictFinding]) -> String {
    let mut message = String::from("Merge conflicts detected:\n");
    for finding in findings {
        message.push_str(&format!("- {finding}\n"));
    }
    message
}

/// Convenience alias for results with [`MergeError`].
pub type Result<T> = std::result::Result<T, MergeError>;
