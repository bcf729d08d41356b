//! Core types for flowgraph editing
//!
//! These types define the editable graph: block instances placed on the
//! canvas and the typed connections between their ports.

use std::collections::BTreeMap;

use block_registry::{BlockDefinition, ParamValue};
use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Stable string key identifying one port within a node's input or output list
pub type HandleId = String;

/// A canvas position (top-left corner of the node box)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This position shifted by an offset
    pub fn offset_by(&self, offset: Position) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
        }
    }
}

/// Per-instance state of a placed block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstanceData {
    /// The static definition this instance was created from
    pub block_definition: BlockDefinition,
    /// Parameter overrides; a missing key means "use the declared default"
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
    /// Instance name, unique within the flowgraph
    pub instance_name: String,
    /// Whether the block participates in the flowgraph
    pub enabled: bool,
    /// Canvas rotation in degrees: 0, 90, 180 or 270
    #[serde(default)]
    pub rotation: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub bus_sink: bool,
    #[serde(default)]
    pub bus_source: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus_structure: Option<String>,
}

impl BlockInstanceData {
    /// Create instance data for a freshly dropped block.
    ///
    /// Declared parameter defaults are copied into the override map so the
    /// exported file carries the full parameter set.
    pub fn new(block_definition: BlockDefinition, instance_name: impl Into<String>) -> Self {
        let mut parameters = BTreeMap::new();
        for param in &block_definition.parameters {
            if let Some(default) = &param.default {
                parameters.insert(param.id.clone(), default.clone());
            }
        }
        Self {
            block_definition,
            parameters,
            instance_name: instance_name.into(),
            enabled: true,
            rotation: 0,
            comment: None,
            affinity: None,
            alias: None,
            bus_sink: false,
            bus_source: false,
            bus_structure: None,
        }
    }

    /// Effective value of a parameter: instance override, else declared default
    pub fn parameter(&self, id: &str) -> Option<ParamValue> {
        if let Some(value) = self.parameters.get(id) {
            return Some(value.clone());
        }
        self.block_definition
            .parameter(id)
            .and_then(|p| p.default.clone())
    }
}

/// A partial update to a node's instance data.
///
/// Provided fields replace the corresponding field wholesale (shallow merge);
/// the `parameters` map in particular is replaced, not merged per key.
#[derive(Debug, Clone, Default)]
pub struct NodeDataPatch {
    pub parameters: Option<BTreeMap<String, ParamValue>>,
    pub instance_name: Option<String>,
    pub enabled: Option<bool>,
    pub rotation: Option<i32>,
    pub comment: Option<Option<String>>,
    pub affinity: Option<Option<String>>,
    pub alias: Option<Option<String>>,
    pub bus_sink: Option<bool>,
    pub bus_source: Option<bool>,
    pub bus_structure: Option<Option<String>>,
}

impl NodeDataPatch {
    /// Patch that only sets the rotation
    pub fn rotation(rotation: i32) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    /// Patch that only replaces the parameter overrides
    pub fn parameters(parameters: BTreeMap<String, ParamValue>) -> Self {
        Self {
            parameters: Some(parameters),
            ..Self::default()
        }
    }

    /// Patch that only sets the enabled flag
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, data: &mut BlockInstanceData) {
        if let Some(parameters) = self.parameters {
            data.parameters = parameters;
        }
        if let Some(instance_name) = self.instance_name {
            data.instance_name = instance_name;
        }
        if let Some(enabled) = self.enabled {
            data.enabled = enabled;
        }
        if let Some(rotation) = self.rotation {
            data.rotation = rotation;
        }
        if let Some(comment) = self.comment {
            data.comment = comment;
        }
        if let Some(affinity) = self.affinity {
            data.affinity = affinity;
        }
        if let Some(alias) = self.alias {
            data.alias = alias;
        }
        if let Some(bus_sink) = self.bus_sink {
            data.bus_sink = bus_sink;
        }
        if let Some(bus_source) = self.bus_source {
            data.bus_source = bus_source;
        }
        if let Some(bus_structure) = self.bus_structure {
            data.bus_structure = bus_structure;
        }
    }
}

/// A block instance placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Canvas position
    pub position: Position,
    /// Ephemeral selection state
    #[serde(default)]
    pub selected: bool,
    /// Instance data
    pub data: BlockInstanceData,
}

/// Connection metadata carried on an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Source port identifier as written in the flowgraph file
    pub source_port: String,
    /// Target port identifier as written in the flowgraph file
    pub target_port: String,
    /// Cached display color derived from the endpoint dtypes.
    /// Recomputed whenever an endpoint dtype could have changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A directed connection from an output port to an input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node id
    pub source: NodeId,
    /// Target node id
    pub target: NodeId,
    /// Handle id derived from the source node's output ports
    pub source_handle: HandleId,
    /// Handle id derived from the target node's input ports
    pub target_handle: HandleId,
    /// Ephemeral selection state
    #[serde(default)]
    pub selected: bool,
    /// Connection metadata
    pub data: EdgeData,
}

impl GraphEdge {
    /// Whether this edge touches the given node on either end
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Deterministic edge id composed from both endpoints.
///
/// Reproducible from the same inputs so that re-importing the same file
/// yields the same edge identities.
pub fn edge_id_for(
    source: &str,
    source_handle: &str,
    target: &str,
    target_handle: &str,
) -> EdgeId {
    format!("{source}-{source_handle}-{target}-{target_handle}")
}

/// A deep, independent copy of the graph used for history and clipboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
