//! Flowgraph file export
//!
//! Exports the current graph back to the interchange format. Options and
//! metadata supplied by a previous import are reused verbatim so flowgraph
//! settings the editor does not model survive a load/save cycle; otherwise a
//! documented default block is synthesized.

use block_registry::ParamValue;

use crate::ports::PortDirection;
use crate::types::{GraphEdge, GraphNode};

use super::handles::file_port_from_handle;
use super::model::{GrcBlock, GrcConnection, GrcFile, GrcMetadata, GrcOptionsBlock, GrcStates};
use super::writer::write_grc;

/// Options/metadata carried into an export
#[derive(Debug, Clone, Default)]
pub struct GrcExportOptions {
    /// Options section from the original file, when the graph was imported
    pub options: Option<GrcOptionsBlock>,
    /// Metadata trailer from the original file
    pub metadata: Option<GrcMetadata>,
}

/// Build the file model for the given graph
pub fn graph_to_grc(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    export_options: GrcExportOptions,
) -> GrcFile {
    let blocks = nodes
        .iter()
        .map(|node| {
            let mut parameters = node.data.parameters.clone();
            for (key, value) in [
                ("comment", &node.data.comment),
                ("affinity", &node.data.affinity),
                ("alias", &node.data.alias),
            ] {
                if let Some(value) = value {
                    parameters.insert(key.to_string(), ParamValue::Text(value.clone()));
                }
            }

            GrcBlock {
                name: node.data.instance_name.clone(),
                id: node.data.block_definition.id.clone(),
                parameters,
                states: GrcStates {
                    bus_sink: node.data.bus_sink,
                    bus_source: node.data.bus_source,
                    bus_structure: node.data.bus_structure.clone(),
                    coordinate: (node.position.x.round(), node.position.y.round()),
                    rotation: node.data.rotation,
                    state: if node.data.enabled {
                        "enabled".to_string()
                    } else {
                        "disabled".to_string()
                    },
                },
            }
        })
        .collect();

    let connections = edges
        .iter()
        .map(|edge| {
            let source = nodes.iter().find(|n| n.id == edge.source);
            let target = nodes.iter().find(|n| n.id == edge.target);

            let source_name = source
                .map(|n| n.data.instance_name.clone())
                .unwrap_or_else(|| edge.source.clone());
            let target_name = target
                .map(|n| n.data.instance_name.clone())
                .unwrap_or_else(|| edge.target.clone());

            let source_port = source
                .map(|n| {
                    file_port_from_handle(
                        &n.data.block_definition,
                        &edge.source_handle,
                        PortDirection::Output,
                    )
                })
                .unwrap_or_else(|| edge.source_handle.clone());
            let target_port = target
                .map(|n| {
                    file_port_from_handle(
                        &n.data.block_definition,
                        &edge.target_handle,
                        PortDirection::Input,
                    )
                })
                .unwrap_or_else(|| edge.target_handle.clone());

            GrcConnection(source_name, source_port, target_name, target_port)
        })
        .collect();

    GrcFile {
        options: Some(
            export_options
                .options
                .unwrap_or_else(GrcOptionsBlock::synthesized),
        ),
        blocks: Some(blocks),
        connections,
        metadata: Some(export_options.metadata.unwrap_or_default()),
    }
}

/// Render the graph to flowgraph file text
pub fn export_grc(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    export_options: GrcExportOptions,
) -> String {
    write_grc(&graph_to_grc(nodes, edges, export_options))
}
