//! Catalog loading service
//!
//! Fetches the block catalog from one of several sources and tracks a
//! loading status the blocks panel can render. A failed load is fatal to the
//! panel only: the store parks in an error state carrying source context and
//! accepts a manual retry, it never retries on its own.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{RegistryError, Result};
use crate::registry::BlockRegistry;
use crate::types::{BlockDefinition, CatalogData};

/// Drag-and-drop payload key for palette entries dragged onto the canvas
pub const BLOCK_DRAG_MIME: &str = "application/x-flowgraph-block";

/// Where the catalog payload comes from
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// A JSON catalog file on disk
    File(PathBuf),
    /// An HTTP endpoint returning the catalog payload
    Http(String),
    /// A payload embedded in the binary
    Embedded(&'static str),
}

impl CatalogSource {
    /// Human-readable source description for error states and status UI
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::File(path) => format!("file: {}", path.display()),
            CatalogSource::Http(url) => format!("http: {url}"),
            CatalogSource::Embedded(_) => "embedded".to_string(),
        }
    }

    /// The endpoint URL, when this is an HTTP source
    pub fn url(&self) -> Option<&str> {
        match self {
            CatalogSource::Http(url) => Some(url.as_str()),
            _ => None,
        }
    }

    /// Fetch and decode the catalog payload
    pub async fn load(&self) -> Result<CatalogData> {
        let data = match self {
            CatalogSource::File(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|source| {
                    RegistryError::CatalogRead {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                serde_json::from_str(&text)?
            }
            CatalogSource::Http(url) => {
                let response = reqwest::Client::new()
                    .post(url)
                    .json(&serde_json::json!({}))
                    .send()
                    .await
                    .map_err(|e| RegistryError::CatalogFetch {
                        url: url.clone(),
                        message: e.to_string(),
                    })?;

                if !response.status().is_success() {
                    return Err(RegistryError::CatalogFetch {
                        url: url.clone(),
                        message: format!("HTTP error: {}", response.status()),
                    });
                }

                response
                    .json::<CatalogData>()
                    .await
                    .map_err(|e| RegistryError::CatalogFetch {
                        url: url.clone(),
                        message: e.to_string(),
                    })?
            }
            CatalogSource::Embedded(text) => serde_json::from_str(text)?,
        };

        if data.blocks.is_empty() && data.blocks_by_category.is_empty() {
            return Err(RegistryError::CatalogFormat(
                "catalog payload has no blocks".to_string(),
            ));
        }

        Ok(data)
    }
}

/// Loading state of the catalog store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Default)]
struct CatalogState {
    status: CatalogStatus,
    error: Option<String>,
    registry: Option<Arc<BlockRegistry>>,
}

/// Shared catalog store with a load/retry status machine.
///
/// `Idle -> Loading -> Ready | Error`. A `load()` call is skipped while a
/// load is in flight or after a successful load; calling it again from the
/// error state is the manual retry path.
pub struct CatalogStore {
    source: CatalogSource,
    state: RwLock<CatalogState>,
}

impl CatalogStore {
    /// Create a store for the given source; no fetch happens until `load`
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// Current status
    pub fn status(&self) -> CatalogStatus {
        self.state.read().status
    }

    /// Error message from the last failed load, with source context
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// The loaded registry, once ready
    pub fn registry(&self) -> Option<Arc<BlockRegistry>> {
        self.state.read().registry.clone()
    }

    /// Source description and optional URL for the status UI
    pub fn source_info(&self) -> (String, Option<String>) {
        (
            self.source.describe(),
            self.source.url().map(|u| u.to_string()),
        )
    }

    /// Load the catalog, updating the status machine.
    ///
    /// Returns the status after the call. Re-entrant calls while loading and
    /// calls after success are no-ops; calls from the error state retry.
    pub async fn load(&self) -> CatalogStatus {
        {
            let mut state = self.state.write();
            match state.status {
                CatalogStatus::Loading => {
                    log::debug!("catalog already loading, skipping");
                    return CatalogStatus::Loading;
                }
                CatalogStatus::Ready if state.registry.is_some() => {
                    log::debug!("catalog already loaded, skipping");
                    return CatalogStatus::Ready;
                }
                _ => {
                    state.status = CatalogStatus::Loading;
                    state.error = None;
                }
            }
        }

        match self.source.load().await {
            Ok(catalog) => {
                let total = catalog.blocks.len();
                let registry = Arc::new(BlockRegistry::from_catalog(catalog));
                let mut state = self.state.write();
                state.registry = Some(registry);
                state.status = CatalogStatus::Ready;
                state.error = None;
                log::info!("loaded {total} blocks from {}", self.source.describe());
                CatalogStatus::Ready
            }
            Err(e) => {
                let message = format!("{e} ({})", self.source.describe());
                log::error!("catalog load failed: {message}");
                let mut state = self.state.write();
                state.registry = None;
                state.status = CatalogStatus::Error;
                state.error = Some(message);
                CatalogStatus::Error
            }
        }
    }

    /// Drop any loaded catalog and return to the idle state
    pub fn reset(&self) {
        *self.state.write() = CatalogState::default();
    }
}

/// Serialize a palette entry for the canvas drag payload
pub fn to_drag_payload(definition: &BlockDefinition) -> Result<String> {
    Ok(serde_json::to_string(definition)?)
}

/// Decode a canvas drop payload back into a block definition
pub fn from_drag_payload(payload: &str) -> Result<BlockDefinition> {
    Ok(serde_json::from_str(payload)?)
}
