//! Shared fixtures for unit tests

use block_registry::{BlockDefinition, BlockParameter, ParamValue, PortSpec};

use crate::types::{
    edge_id_for, BlockInstanceData, EdgeData, GraphEdge, GraphNode, Position,
};

/// A minimal block type with one input and one output stream port
pub fn simple_definition(id: &str) -> BlockDefinition {
    BlockDefinition {
        id: id.to_string(),
        label: id.to_string(),
        category: Some("Test".to_string()),
        flags: Vec::new(),
        parameters: Vec::new(),
        inputs: vec![PortSpec::stream("float")],
        outputs: vec![PortSpec::stream("float")],
        documentation: None,
        file_format: None,
    }
}

/// A signal-source-like block: dtype-parameterized output, no inputs
pub fn sig_source_definition() -> BlockDefinition {
    BlockDefinition {
        id: "analog_sig_source_x".to_string(),
        label: "Signal Source".to_string(),
        category: Some("Waveform Generators".to_string()),
        flags: Vec::new(),
        parameters: vec![
            BlockParameter {
                id: "type".to_string(),
                label: "Output Type".to_string(),
                dtype: "enum".to_string(),
                default: Some(ParamValue::from("complex")),
                options: Some(vec!["complex".to_string(), "float".to_string()]),
                option_labels: Some(vec!["Complex".to_string(), "Float".to_string()]),
                hide: None,
            },
            BlockParameter {
                id: "freq".to_string(),
                label: "Frequency".to_string(),
                dtype: "real".to_string(),
                default: Some(ParamValue::Int(1000)),
                options: None,
                option_labels: None,
                hide: None,
            },
        ],
        inputs: Vec::new(),
        outputs: vec![PortSpec::stream("${ type }")],
        documentation: None,
        file_format: None,
    }
}

/// A sink-like block: one complex input, no outputs
pub fn sink_definition() -> BlockDefinition {
    BlockDefinition {
        id: "blocks_null_sink".to_string(),
        label: "Null Sink".to_string(),
        category: Some("Misc".to_string()),
        flags: Vec::new(),
        parameters: Vec::new(),
        inputs: vec![PortSpec::stream("complex")],
        outputs: Vec::new(),
        documentation: None,
        file_format: None,
    }
}

/// A node wrapping the given definition, named after its id
pub fn node_with_definition(id: &str, definition: BlockDefinition) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        position: Position::default(),
        selected: false,
        data: BlockInstanceData::new(definition, id),
    }
}

/// A node of a trivial block type
pub fn test_node(id: &str) -> GraphNode {
    node_with_definition(id, simple_definition("test_block"))
}

/// An out0 -> in0 edge between two node ids
pub fn test_edge(source: &str, target: &str) -> GraphEdge {
    GraphEdge {
        id: edge_id_for(source, "out0", target, "in0"),
        source: source.to_string(),
        target: target.to_string(),
        source_handle: "out0".to_string(),
        target_handle: "in0".to_string(),
        selected: false,
        data: EdgeData {
            source_port: "0".to_string(),
            target_port: "0".to_string(),
            color: None,
        },
    }
}

/// An edge between two concrete nodes using the given handles
pub fn connect_nodes(
    source: &GraphNode,
    source_handle: &str,
    target: &GraphNode,
    target_handle: &str,
) -> GraphEdge {
    GraphEdge {
        id: edge_id_for(&source.id, source_handle, &target.id, target_handle),
        source: source.id.clone(),
        target: target.id.clone(),
        source_handle: source_handle.to_string(),
        target_handle: target_handle.to_string(),
        selected: false,
        data: EdgeData {
            source_port: source_handle.to_string(),
            target_port: target_handle.to_string(),
            color: None,
        },
    }
}
