//! Graph-editing core for the flowgraph editor
//!
//! This crate implements the editable-graph side of a visual flowgraph
//! editor for signal-processing block diagrams:
//!
//! - A graph store holding the canonical node/edge state, with a narrow
//!   mutation API and an observer mechanism for UI bindings
//! - Snapshot-based undo/redo with bounded history
//! - Clipboard and duplication (copy/cut/paste, duplicate-on-drag)
//! - Port handle derivation and dtype-driven connection coloring
//! - A bidirectional converter to and from the YAML flowgraph file format,
//!   including reconciliation between index-based file port identifiers and
//!   derived handle ids
//! - An auto-layout adapter over a hierarchical layout engine
//!
//! # Architecture
//!
//! `EditorSession` is the operation surface the UI calls into; it owns the
//! `GraphStore`, `TemporalStore`, `ClipboardStore` and the id generators and
//! enforces the snapshot-before-mutate discipline. Everything below it is a
//! plain synchronous data structure: there is no background mutation path,
//! so no operation can observe a torn state.
//!
//! Block definitions come from the `block-registry` crate; the converter
//! resolves block types against its read-only lookup.

pub mod clipboard;
pub mod editor;
pub mod error;
pub mod grc;
pub mod id;
pub mod layout;
pub mod ports;
pub mod store;
pub mod temporal;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types
pub use clipboard::{duplicate_nodes, ClipboardStore, DuplicateOptions};
pub use editor::EditorSession;
pub use error::{GraphEngineError, Result};
pub use grc::{
    export_grc, parse_grc, validate_grc_file, GrcExportOptions, GrcFile, GrcValidationError,
    ImportResult,
};
pub use id::{CloneIdGenerator, NodeIdGenerator};
pub use layout::{LayoutDirection, LayoutOptions};
pub use ports::{
    edge_color_from_dtypes, port_dtype_from_node, port_handle_id, visible_ports, PortDirection,
};
pub use store::GraphStore;
pub use temporal::{TemporalStore, HISTORY_LIMIT};
pub use types::{
    BlockInstanceData, EdgeData, EdgeId, GraphEdge, GraphNode, GraphSnapshot, HandleId,
    NodeDataPatch, NodeId, Position,
};

// Re-export catalog types consumers will need
pub use block_registry::{BlockDefinition, BlockParameter, BlockRegistry, ParamValue, PortSpec};
