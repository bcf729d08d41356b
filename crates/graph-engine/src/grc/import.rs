//! Flowgraph file import
//!
//! Import is partial-failure tolerant: a malformed document yields an empty
//! result plus a warning, an unknown block type skips that block, and a
//! connection referencing a skipped or undeclared block skips that
//! connection. Warnings accumulate so the caller can surface one aggregated
//! notification after the import completes.

use std::collections::BTreeMap;

use block_registry::{BlockRegistry, ParamValue};

use crate::ports::{edge_color_from_dtypes, port_dtype_from_node, PortDirection};
use crate::types::{
    edge_id_for, BlockInstanceData, EdgeData, GraphEdge, GraphNode, Position,
};

use super::handles::handle_from_file_port;
use super::model::{GrcFile, GrcMetadata, GrcOptionsBlock};

/// Result of parsing a flowgraph file
#[derive(Debug, Default)]
pub struct ImportResult {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// The file's options section, carried for save round-trips
    pub options: Option<GrcOptionsBlock>,
    /// The file's metadata trailer
    pub metadata: Option<GrcMetadata>,
    /// Non-fatal problems encountered during import
    pub warnings: Vec<String>,
    /// True when the document could not be read at all; callers keep their
    /// current document in that case instead of replacing it with nothing
    pub parse_failed: bool,
}

fn text_parameter(parameters: &BTreeMap<String, ParamValue>, key: &str) -> Option<String> {
    match parameters.get(key) {
        Some(ParamValue::Text(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Parse flowgraph file text into nodes and edges.
///
/// Block types are resolved against the registry; unresolvable blocks and
/// connections are skipped with a warning rather than failing the import.
pub fn parse_grc(text: &str, registry: &BlockRegistry) -> ImportResult {
    let mut result = ImportResult::default();

    let file: GrcFile = match serde_yaml::from_str(text) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("flowgraph parse failed: {e}");
            result
                .warnings
                .push(format!("Failed to parse flowgraph file: {e}"));
            result.parse_failed = true;
            return result;
        }
    };

    let blocks = file.blocks.unwrap_or_default();
    if blocks.is_empty() && file.options.is_none() && file.metadata.is_none() {
        result
            .warnings
            .push("Flowgraph file has no content".to_string());
        result.parse_failed = true;
        return result;
    }

    result.options = file.options;
    result.metadata = file.metadata;

    for block in blocks {
        let Some(definition) = registry.get(&block.id) else {
            log::warn!("unknown block type '{}' for block '{}'", block.id, block.name);
            result.warnings.push(format!(
                "Unknown block type '{}' for block '{}', skipping",
                block.id, block.name
            ));
            continue;
        };

        let data = BlockInstanceData {
            block_definition: definition.clone(),
            comment: text_parameter(&block.parameters, "comment"),
            affinity: text_parameter(&block.parameters, "affinity"),
            alias: text_parameter(&block.parameters, "alias"),
            parameters: block.parameters,
            instance_name: block.name.clone(),
            enabled: block.states.state == "enabled",
            rotation: block.states.rotation,
            bus_sink: block.states.bus_sink,
            bus_source: block.states.bus_source,
            bus_structure: block.states.bus_structure,
        };
        result.nodes.push(GraphNode {
            id: block.name,
            position: Position::new(block.states.coordinate.0, block.states.coordinate.1),
            selected: false,
            data,
        });
    }

    for connection in file.connections {
        let source = result.nodes.iter().find(|n| n.id == connection.source());
        let target = result.nodes.iter().find(|n| n.id == connection.target());

        let (Some(source), Some(target)) = (source, target) else {
            let missing = if source.is_none() {
                connection.source()
            } else {
                connection.target()
            };
            result.warnings.push(format!(
                "Connection references unknown block '{missing}', skipping"
            ));
            continue;
        };

        let source_handle = handle_from_file_port(
            &source.data.block_definition,
            connection.source_port(),
            PortDirection::Output,
        );
        let target_handle = handle_from_file_port(
            &target.data.block_definition,
            connection.target_port(),
            PortDirection::Input,
        );

        let color = edge_color_from_dtypes(
            port_dtype_from_node(source, &source_handle, PortDirection::Output).as_deref(),
            port_dtype_from_node(target, &target_handle, PortDirection::Input).as_deref(),
        );

        result.edges.push(GraphEdge {
            id: edge_id_for(&source.id, &source_handle, &target.id, &target_handle),
            source: source.id.clone(),
            target: target.id.clone(),
            source_handle,
            target_handle,
            selected: false,
            data: EdgeData {
                source_port: connection.source_port().to_string(),
                target_port: connection.target_port().to_string(),
                color: Some(color.to_string()),
            },
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sig_source_definition, sink_definition};

    fn test_registry() -> BlockRegistry {
        let mut registry = BlockRegistry::new();
        registry.register(sig_source_definition());
        registry.register(sink_definition());
        registry
    }

    const VALID_FILE: &str = r#"
options:
  parameters:
    title: Test Flowgraph
    author: ''
  states:
    coordinate: [8, 8]
    rotation: 0
    state: enabled

blocks:
- name: src_0
  id: analog_sig_source_x
  parameters:
    freq: '1000'
    type: complex
  states:
    bus_sink: false
    bus_source: false
    bus_structure: null
    coordinate: [150, 250]
    rotation: 90
    state: enabled
- name: sink_0
  id: blocks_null_sink
  parameters: {}
  states:
    coordinate: [400, 250]
    rotation: 0
    state: disabled

connections:
- [src_0, '0', sink_0, '0']

metadata:
  file_format: 1
  grc_version: 3.10.12.0
"#;

    #[test]
    fn test_parse_valid_file() {
        let result = parse_grc(VALID_FILE, &test_registry());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert!(!result.parse_failed);
        assert_eq!(result.nodes.len(), 2);
        assert_eq!(result.edges.len(), 1);

        let src = &result.nodes[0];
        assert_eq!(src.id, "src_0");
        assert_eq!(src.data.instance_name, "src_0");
        assert_eq!(src.position, Position::new(150.0, 250.0));
        assert_eq!(src.data.rotation, 90);
        assert!(src.data.enabled);
        assert_eq!(
            src.data.parameters.get("freq"),
            Some(&ParamValue::Text("1000".to_string()))
        );

        let sink = &result.nodes[1];
        assert!(!sink.data.enabled);

        assert_eq!(result.options.as_ref().unwrap().parameters["title"].as_display(), "Test Flowgraph");
        assert_eq!(result.metadata.as_ref().unwrap().grc_version, "3.10.12.0");
    }

    #[test]
    fn test_connection_ports_resolve_to_handles() {
        let result = parse_grc(VALID_FILE, &test_registry());
        let edge = &result.edges[0];
        assert_eq!(edge.source, "src_0");
        assert_eq!(edge.target, "sink_0");
        assert_eq!(edge.source_handle, "out0");
        assert_eq!(edge.target_handle, "in0");
        // Raw file identifiers are preserved in the edge data
        assert_eq!(edge.data.source_port, "0");
        assert_eq!(edge.data.target_port, "0");
        assert_eq!(edge.id, "src_0-out0-sink_0-in0");
    }

    #[test]
    fn test_unknown_block_type_is_skipped_with_warning() {
        let yaml = r#"
blocks:
- name: known_0
  id: blocks_null_sink
  parameters: {}
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled
- name: mystery_0
  id: totally_unknown_block_type
  parameters: {}
  states:
    coordinate: [100, 100]
    rotation: 0
    state: enabled

connections: []

metadata:
  file_format: 1
  grc_version: 3.10.0
"#;
        let result = parse_grc(yaml, &test_registry());
        assert_eq!(result.nodes.len(), 1);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Unknown block type"));
        assert!(result.warnings[0].contains("mystery_0"));
        assert!(!result.parse_failed);
    }

    #[test]
    fn test_connection_to_skipped_block_is_dropped() {
        let yaml = r#"
blocks:
- name: sink_0
  id: blocks_null_sink
  parameters: {}
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled
- name: ghost_0
  id: unknown_type
  parameters: {}
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled

connections:
- [ghost_0, '0', sink_0, '0']

metadata:
  file_format: 1
  grc_version: 3.10.0
"#;
        let result = parse_grc(yaml, &test_registry());
        assert_eq!(result.nodes.len(), 1);
        assert!(result.edges.is_empty());
        // One warning for the block, one for the dangling connection
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[1].contains("ghost_0"));
    }

    #[test]
    fn test_malformed_yaml_yields_empty_graph() {
        let result = parse_grc("this is not: valid: yaml: content::", &test_registry());
        assert!(result.nodes.is_empty());
        assert!(result.edges.is_empty());
        assert!(!result.warnings.is_empty());
        assert!(result.parse_failed);
    }

    #[test]
    fn test_empty_document_yields_warning() {
        let result = parse_grc("", &test_registry());
        assert!(result.nodes.is_empty());
        assert!(!result.warnings.is_empty());
        assert!(result.parse_failed);
    }

    #[test]
    fn test_cosmetic_parameters_are_mirrored() {
        let yaml = r#"
blocks:
- name: sink_0
  id: blocks_null_sink
  parameters:
    comment: measured at the antenna
    affinity: ''
    alias: antenna_sink
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled

connections: []

metadata:
  file_format: 1
  grc_version: 3.10.0
"#;
        let result = parse_grc(yaml, &test_registry());
        let data = &result.nodes[0].data;
        assert_eq!(data.comment.as_deref(), Some("measured at the antenna"));
        assert_eq!(data.alias.as_deref(), Some("antenna_sink"));
        // Empty strings are not promoted
        assert!(data.affinity.is_none());
        // The raw parameters stay verbatim for export
        assert!(data.parameters.contains_key("comment"));
    }

    #[test]
    fn test_unresolved_port_passes_through() {
        let yaml = r#"
blocks:
- name: src_0
  id: analog_sig_source_x
  parameters: {}
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled
- name: sink_0
  id: blocks_null_sink
  parameters: {}
  states:
    coordinate: [0, 0]
    rotation: 0
    state: enabled

connections:
- [src_0, weird_port, sink_0, '0']

metadata:
  file_format: 1
  grc_version: 3.10.0
"#;
        let result = parse_grc(yaml, &test_registry());
        assert_eq!(result.edges.len(), 1);
        assert_eq!(result.edges[0].source_handle, "weird_port");
    }
}
