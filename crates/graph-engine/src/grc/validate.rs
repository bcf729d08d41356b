//! Structural validation of parsed flowgraph files
//!
//! Validation reports every problem it finds as a list; nothing is thrown.
//! The caller decides whether the problems block a save or a load.

use std::collections::HashSet;

use super::model::GrcFile;

/// A structural problem in a flowgraph file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrcValidationError {
    /// A required top-level section is absent
    MissingSection(&'static str),
    /// Two blocks share the same name
    DuplicateBlockName { name: String },
    /// A connection's source name resolves to no declared block
    UnknownSourceBlock { name: String },
    /// A connection's target name resolves to no declared block
    UnknownTargetBlock { name: String },
}

impl std::fmt::Display for GrcValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSection(section) => {
                write!(f, "Missing required section '{section}'")
            }
            Self::DuplicateBlockName { name } => {
                write!(f, "Duplicate block name '{name}'")
            }
            Self::UnknownSourceBlock { name } => {
                write!(f, "Connection references unknown source block '{name}'")
            }
            Self::UnknownTargetBlock { name } => {
                write!(f, "Connection references unknown target block '{name}'")
            }
        }
    }
}

impl std::error::Error for GrcValidationError {}

/// Validate a parsed flowgraph file.
///
/// Returns `None` when the file is valid — callers must treat `None` as the
/// "valid" sentinel, never an empty list.
pub fn validate_grc_file(file: &GrcFile) -> Option<Vec<GrcValidationError>> {
    let mut errors = Vec::new();

    if file.options.is_none() {
        errors.push(GrcValidationError::MissingSection("options"));
    }
    if file.blocks.is_none() {
        errors.push(GrcValidationError::MissingSection("blocks"));
    }
    if file.metadata.is_none() {
        errors.push(GrcValidationError::MissingSection("metadata"));
    }

    let blocks = file.blocks.as_deref().unwrap_or_default();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    for block in blocks {
        if !seen.insert(&block.name) && reported.insert(&block.name) {
            errors.push(GrcValidationError::DuplicateBlockName {
                name: block.name.clone(),
            });
        }
    }

    for connection in &file.connections {
        if !seen.contains(connection.source()) {
            errors.push(GrcValidationError::UnknownSourceBlock {
                name: connection.source().to_string(),
            });
        }
        if !seen.contains(connection.target()) {
            errors.push(GrcValidationError::UnknownTargetBlock {
                name: connection.target().to_string(),
            });
        }
    }

    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}
