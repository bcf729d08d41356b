//! Bidirectional converter between the graph model and the flowgraph file
//! format
//!
//! Import and export reconcile port identifiers between the file's
//! index/name addressing and the editor's derived handle ids; validation
//! checks the structural invariants of an already-parsed file.

use std::path::Path;

pub mod export;
mod handles;
pub mod import;
pub mod model;
pub mod validate;
mod writer;

/// Read a flowgraph document whole, as the import path expects
pub fn read_flowgraph(path: impl AsRef<Path>) -> crate::error::Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Write exported flowgraph text as the file's full contents
pub fn write_flowgraph(path: impl AsRef<Path>, text: &str) -> crate::error::Result<()> {
    Ok(std::fs::write(path, text)?)
}

pub use export::{export_grc, graph_to_grc, GrcExportOptions};
pub use handles::{file_port_from_handle, handle_from_file_port};
pub use import::{parse_grc, ImportResult};
pub use model::{
    GrcBlock, GrcConnection, GrcFile, GrcMetadata, GrcOptionsBlock, GrcStates,
    GRC_FILE_EXTENSION,
};
pub use validate::{validate_grc_file, GrcValidationError};
