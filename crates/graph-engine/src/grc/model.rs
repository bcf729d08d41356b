//! Data model of the flowgraph interchange format
//!
//! Mirrors the on-disk YAML structure: a free-form `options` block, the
//! `blocks` list, index-addressed `connections` tuples, and a `metadata`
//! trailer. Sections the editor does not model are carried verbatim so a
//! load/save cycle preserves them.

use std::collections::BTreeMap;

use block_registry::ParamValue;
use serde::{Deserialize, Serialize};

/// Reserved file extension for flowgraph documents
pub const GRC_FILE_EXTENSION: &str = "grc";

/// Canvas/runtime state attached to each block in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrcStates {
    #[serde(default)]
    pub bus_sink: bool,
    #[serde(default)]
    pub bus_source: bool,
    #[serde(default)]
    pub bus_structure: Option<String>,
    /// Canvas coordinate; the file format requires integers, parsing is lenient
    #[serde(default)]
    pub coordinate: (f64, f64),
    #[serde(default)]
    pub rotation: i32,
    /// "enabled", "disabled" or a runtime-specific state
    #[serde(default = "default_state")]
    pub state: String,
}

fn default_state() -> String {
    "enabled".to_string()
}

impl Default for GrcStates {
    fn default() -> Self {
        Self {
            bus_sink: false,
            bus_source: false,
            bus_structure: None,
            coordinate: (0.0, 0.0),
            rotation: 0,
            state: default_state(),
        }
    }
}

/// One block declaration in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrcBlock {
    /// Instance name, unique within the file; maps to the node id
    pub name: String,
    /// Block type id, resolved against the catalog
    pub id: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
    #[serde(default)]
    pub states: GrcStates,
}

/// The top-level `options` section: flowgraph-wide parameters plus states.
///
/// Options the editor does not model (generate options, run command, ...)
/// ride along in `parameters` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrcOptionsBlock {
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
    #[serde(default)]
    pub states: GrcStates,
}

/// A connection tuple: `[source name, source port, target name, target port]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrcConnection(pub String, pub String, pub String, pub String);

impl GrcConnection {
    pub fn source(&self) -> &str {
        &self.0
    }

    pub fn source_port(&self) -> &str {
        &self.1
    }

    pub fn target(&self) -> &str {
        &self.2
    }

    pub fn target_port(&self) -> &str {
        &self.3
    }
}

/// File format trailer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrcMetadata {
    pub file_format: u32,
    pub grc_version: String,
}

impl Default for GrcMetadata {
    fn default() -> Self {
        Self {
            file_format: 1,
            grc_version: "3.10.12.0".to_string(),
        }
    }
}

/// A parsed flowgraph file.
///
/// The required sections stay optional here so validation can report their
/// absence instead of the parser rejecting the document outright.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrcFile {
    #[serde(default)]
    pub options: Option<GrcOptionsBlock>,
    #[serde(default)]
    pub blocks: Option<Vec<GrcBlock>>,
    #[serde(default)]
    pub connections: Vec<GrcConnection>,
    #[serde(default)]
    pub metadata: Option<GrcMetadata>,
}

impl GrcOptionsBlock {
    /// Default options block synthesized for graphs that were never loaded
    /// from a file.
    pub fn synthesized() -> Self {
        let mut parameters = BTreeMap::new();
        parameters.insert("author".to_string(), ParamValue::Text(String::new()));
        parameters.insert(
            "title".to_string(),
            ParamValue::Text("Untitled".to_string()),
        );
        Self {
            parameters,
            states: GrcStates {
                coordinate: (8.0, 8.0),
                ..GrcStates::default()
            },
        }
    }
}
