//! Read-only lookup service over the loaded block catalog
//!
//! The registry maps block type identifiers to their definitions and keeps
//! the palette's category grouping. The editor core only ever consumes this
//! read contract; how the catalog got populated (file, HTTP, embedded) is the
//! loader's concern.

use std::collections::{BTreeMap, HashMap};

use crate::types::{BlockDefinition, CatalogData};

/// Registry of block definitions keyed by type id
#[derive(Debug, Default)]
pub struct BlockRegistry {
    blocks: HashMap<String, BlockDefinition>,
    by_category: BTreeMap<String, Vec<BlockDefinition>>,
}

impl BlockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a catalog payload.
    ///
    /// When the payload has no pre-grouped categories, the grouping is
    /// rebuilt from each definition's `category` field ("Uncategorized"
    /// for definitions without one).
    pub fn from_catalog(catalog: CatalogData) -> Self {
        let mut registry = Self::new();

        let by_category = if catalog.blocks_by_category.is_empty() {
            let mut grouped: BTreeMap<String, Vec<BlockDefinition>> = BTreeMap::new();
            for block in &catalog.blocks {
                let category = block
                    .category
                    .clone()
                    .unwrap_or_else(|| "Uncategorized".to_string());
                grouped.entry(category).or_default().push(block.clone());
            }
            grouped
        } else {
            catalog.blocks_by_category
        };

        registry.by_category = by_category;
        for block in catalog.blocks {
            registry.blocks.insert(block.id.clone(), block);
        }
        registry
    }

    /// Register a single definition (palette plugins, tests)
    pub fn register(&mut self, definition: BlockDefinition) {
        let category = definition
            .category
            .clone()
            .unwrap_or_else(|| "Uncategorized".to_string());
        self.by_category
            .entry(category)
            .or_default()
            .push(definition.clone());
        self.blocks.insert(definition.id.clone(), definition);
    }

    /// Look up a block definition by type id
    pub fn get(&self, type_id: &str) -> Option<&BlockDefinition> {
        self.blocks.get(type_id)
    }

    /// Whether the type id is known
    pub fn contains(&self, type_id: &str) -> bool {
        self.blocks.contains_key(type_id)
    }

    /// All definitions grouped by category, in stable category order
    pub fn all_by_category(&self) -> &BTreeMap<String, Vec<BlockDefinition>> {
        &self.by_category
    }

    /// Number of registered block types
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
