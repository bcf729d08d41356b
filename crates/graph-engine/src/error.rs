//! Error types for the graph engine

use thiserror::Error;

/// Result type alias using GraphEngineError
pub type Result<T> = std::result::Result<T, GraphEngineError>;

/// Errors that can occur in the graph engine.
///
/// Most editing paths are total by design: import collects warnings instead
/// of failing, and unresolved port handles degrade to passthrough strings.
/// These variants cover the remaining hard failures.
#[derive(Debug, Error)]
pub enum GraphEngineError {
    /// A referenced node does not exist in the graph
    #[error("Unknown node '{0}'")]
    UnknownNode(String),

    /// A referenced edge does not exist in the graph
    #[error("Unknown edge '{0}'")]
    UnknownEdge(String),

    /// I/O error reading or writing a flowgraph file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
