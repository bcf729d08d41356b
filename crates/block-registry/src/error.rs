//! Error types for the block registry

use thiserror::Error;

/// Result type alias using RegistryError
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while loading or querying the block catalog
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Catalog file could not be read
    #[error("Failed to read catalog file '{path}': {source}")]
    CatalogRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog payload could not be decoded
    #[error("Invalid catalog payload: {0}")]
    CatalogDecode(#[from] serde_json::Error),

    /// HTTP catalog endpoint failed
    #[error("Failed to fetch catalog from '{url}': {message}")]
    CatalogFetch { url: String, message: String },

    /// Catalog payload is missing required fields
    #[error("Invalid catalog format: {0}")]
    CatalogFormat(String),
}
