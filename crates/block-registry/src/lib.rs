//! Block catalog registry for the flowgraph editor
//!
//! This crate owns the catalog side of the editor: the immutable block
//! definitions parsed from descriptor files, a read-only registry the graph
//! core resolves block types against, and the loader service that fetches
//! the catalog from a file, an HTTP endpoint, or an embedded payload.
//!
//! The graph-editing core (`graph-engine`) consumes only the read contract:
//! `BlockRegistry::get` and `BlockRegistry::all_by_category`.

pub mod error;
pub mod registry;
pub mod service;
pub mod types;

// Re-export key types
pub use error::{RegistryError, Result};
pub use registry::BlockRegistry;
pub use service::{
    from_drag_payload, to_drag_payload, CatalogSource, CatalogStatus, CatalogStore,
    BLOCK_DRAG_MIME,
};
pub use types::{
    BlockDefinition, BlockParameter, CatalogData, OptionalFlag, ParamDtype, ParamValue,
    PortDomain, PortSpec, StreamDtype,
};
