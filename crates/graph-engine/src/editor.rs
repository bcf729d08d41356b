//! Editor session: the semantic operation surface
//!
//! Every user-facing editing operation maps 1:1 onto a method here; UI
//! chrome (toolbars, keyboard bindings, the command palette) only ever calls
//! these. The session enforces the snapshot-before-mutate discipline:
//! structural changes, parameter edits, rotation and drag gestures snapshot
//! history first, selection changes never do.

use std::collections::{HashMap, HashSet};

use block_registry::{BlockDefinition, BlockRegistry, ParamValue};

use crate::clipboard::{duplicate_nodes, ClipboardStore, DuplicateOptions};
use crate::error::{GraphEngineError, Result};
use crate::grc::export::{export_grc, GrcExportOptions};
use crate::grc::import::parse_grc;
use crate::id::{CloneIdGenerator, NodeIdGenerator};
use crate::layout::{layout_positions, LayoutOptions};
use crate::ports::{edge_color_from_dtypes, port_dtype_from_node, PortDirection};
use crate::store::GraphStore;
use crate::temporal::TemporalStore;
use crate::types::{
    edge_id_for, BlockInstanceData, EdgeData, EdgeId, GraphEdge, GraphNode, NodeDataPatch, NodeId,
    Position,
};

/// Offset applied to pasted clones so they don't sit on the originals
const PASTE_OFFSET: Position = Position { x: 20.0, y: 20.0 };

/// One editor session: the graph, its history, the clipboard and the id
/// generators, constructed once per open document.
pub struct EditorSession {
    graph: GraphStore,
    history: TemporalStore,
    clipboard: ClipboardStore,
    node_ids: NodeIdGenerator,
    clone_ids: CloneIdGenerator,
    dirty: bool,
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            graph: GraphStore::new(),
            history: TemporalStore::new(),
            clipboard: ClipboardStore::new(),
            node_ids: NodeIdGenerator::new(),
            clone_ids: CloneIdGenerator::new(),
            dirty: false,
        }
    }

    /// Session with an injected clone id generator (tests)
    pub fn with_clone_ids(clone_ids: CloneIdGenerator) -> Self {
        Self {
            clone_ids,
            ..Self::new()
        }
    }

    /// The underlying graph store (read access and subscriptions)
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// Mutable store access for UI bindings that manage subscriptions
    pub fn graph_mut(&mut self) -> &mut GraphStore {
        &mut self.graph
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether the document has unsaved changes. Destructive bulk operations
    /// (new document over a dirty graph) must be confirmed by the user
    /// before the caller proceeds.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clipboard contents (read-only)
    pub fn clipboard(&self) -> &ClipboardStore {
        &self.clipboard
    }

    // ---- node creation ------------------------------------------------

    /// Instantiate a block at the given canvas position (palette drop).
    ///
    /// Parameter defaults from the definition are copied into the instance.
    pub fn drop_block(&mut self, definition: BlockDefinition, position: Position) -> NodeId {
        let id = self.node_ids.next();
        self.history.take_snapshot(&self.graph);
        let data = BlockInstanceData::new(definition, id.clone());
        self.graph.add_node(GraphNode {
            id: id.clone(),
            position,
            selected: false,
            data,
        });
        self.dirty = true;
        id
    }

    // ---- wiring --------------------------------------------------------

    /// Connect an output port to an input port.
    ///
    /// The edge color is derived from the endpoint dtypes; a mismatch is
    /// flagged visually but the connection is still made. Fails when either
    /// endpoint node does not exist.
    pub fn connect(
        &mut self,
        source: &str,
        source_handle: &str,
        target: &str,
        target_handle: &str,
    ) -> Result<EdgeId> {
        let Some(source_node) = self.graph.node(source) else {
            return Err(GraphEngineError::UnknownNode(source.to_string()));
        };
        let Some(target_node) = self.graph.node(target) else {
            return Err(GraphEngineError::UnknownNode(target.to_string()));
        };

        let id = edge_id_for(source, source_handle, target, target_handle);
        if self.graph.edge(&id).is_some() {
            return Ok(id);
        }

        let color = edge_color_from_dtypes(
            port_dtype_from_node(source_node, source_handle, PortDirection::Output).as_deref(),
            port_dtype_from_node(target_node, target_handle, PortDirection::Input).as_deref(),
        )
        .to_string();

        self.history.take_snapshot(&self.graph);
        self.graph.add_edge(GraphEdge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.to_string(),
            target_handle: target_handle.to_string(),
            selected: false,
            data: EdgeData {
                source_port: source_handle.to_string(),
                target_port: target_handle.to_string(),
                color: Some(color),
            },
        });
        self.dirty = true;
        Ok(id)
    }

    /// Remove a single edge
    pub fn disconnect(&mut self, edge_id: &str) -> Result<()> {
        if self.graph.edge(edge_id).is_none() {
            return Err(GraphEngineError::UnknownEdge(edge_id.to_string()));
        }
        self.history.take_snapshot(&self.graph);
        self.graph.remove_edge(edge_id);
        self.dirty = true;
        Ok(())
    }

    /// Remove a node and every edge touching it
    pub fn delete_node(&mut self, node_id: &str) -> Result<()> {
        if self.graph.node(node_id).is_none() {
            return Err(GraphEngineError::UnknownNode(node_id.to_string()));
        }
        self.history.take_snapshot(&self.graph);
        self.graph.delete_node_and_edges(node_id);
        self.dirty = true;
        Ok(())
    }

    // ---- selection (transient, never snapshots) ------------------------

    pub fn set_node_selected(&mut self, node_id: &str, selected: bool) {
        let nodes = self
            .graph
            .nodes()
            .iter()
            .cloned()
            .map(|mut node| {
                if node.id == node_id {
                    node.selected = selected;
                }
                node
            })
            .collect();
        self.graph.set_nodes(nodes);
    }

    pub fn set_edge_selected(&mut self, edge_id: &str, selected: bool) {
        let edges = self
            .graph
            .edges()
            .iter()
            .cloned()
            .map(|mut edge| {
                if edge.id == edge_id {
                    edge.selected = selected;
                }
                edge
            })
            .collect();
        self.graph.set_edges(edges);
    }

    pub fn clear_selection(&mut self) {
        let nodes = self
            .graph
            .nodes()
            .iter()
            .cloned()
            .map(|mut node| {
                node.selected = false;
                node
            })
            .collect();
        let edges = self
            .graph
            .edges()
            .iter()
            .cloned()
            .map(|mut edge| {
                edge.selected = false;
                edge
            })
            .collect();
        self.graph.set_nodes(nodes);
        self.graph.set_edges(edges);
    }

    fn selected_nodes(&self) -> Vec<GraphNode> {
        self.graph
            .nodes()
            .iter()
            .filter(|n| n.selected)
            .cloned()
            .collect()
    }

    /// Whether any node or edge is selected
    pub fn has_selection(&self) -> bool {
        self.graph.nodes().iter().any(|n| n.selected)
            || self.graph.edges().iter().any(|e| e.selected)
    }

    // ---- clipboard ------------------------------------------------------

    /// Copy selected nodes and their internal edges to the clipboard.
    ///
    /// Edges with only one selected endpoint are dropped from the payload;
    /// that scope-narrowing is intentional.
    pub fn copy(&mut self) {
        let selected = self.selected_nodes();
        if selected.is_empty() {
            return;
        }
        let selected_ids: HashSet<&str> = selected.iter().map(|n| n.id.as_str()).collect();
        let internal_edges: Vec<GraphEdge> = self
            .graph
            .edges()
            .iter()
            .filter(|e| {
                selected_ids.contains(e.source.as_str()) && selected_ids.contains(e.target.as_str())
            })
            .cloned()
            .collect();
        self.clipboard.set(selected, internal_edges);
    }

    /// Cut: copy, then remove the selection.
    ///
    /// Unlike copy, removal also takes the boundary edges (one endpoint
    /// selected) — they would dangle otherwise.
    pub fn cut(&mut self) {
        let selected = self.selected_nodes();
        if selected.is_empty() {
            return;
        }
        let selected_ids: HashSet<String> = selected.iter().map(|n| n.id.clone()).collect();
        let internal_edges: Vec<GraphEdge> = self
            .graph
            .edges()
            .iter()
            .filter(|e| selected_ids.contains(&e.source) && selected_ids.contains(&e.target))
            .cloned()
            .collect();
        self.clipboard.set(selected, internal_edges);

        self.history.take_snapshot(&self.graph);

        let selected_edge_ids: HashSet<String> = self
            .graph
            .edges()
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id.clone())
            .collect();
        let nodes = self
            .graph
            .nodes()
            .iter()
            .filter(|n| !selected_ids.contains(&n.id))
            .cloned()
            .collect();
        let edges = self
            .graph
            .edges()
            .iter()
            .filter(|e| {
                !selected_edge_ids.contains(&e.id)
                    && !selected_ids.contains(&e.source)
                    && !selected_ids.contains(&e.target)
            })
            .cloned()
            .collect();
        self.graph.set_nodes(nodes);
        self.graph.set_edges(edges);
        self.dirty = true;
    }

    /// Paste clipboard contents with fresh ids, offset and selected.
    ///
    /// Everything previously selected is deselected so the paste result is
    /// the active selection. Returns the new node ids.
    pub fn paste(&mut self) -> Vec<NodeId> {
        let Some(clip) = self
            .clipboard
            .get()
            .filter(|c| !c.nodes.is_empty())
            .cloned()
        else {
            return Vec::new();
        };

        self.history.take_snapshot(&self.graph);

        let (cloned_nodes, cloned_edges) = duplicate_nodes(
            &clip.nodes,
            &clip.edges,
            DuplicateOptions {
                position_offset: PASTE_OFFSET,
                selected: true,
            },
            &mut self.clone_ids,
        );
        let new_ids: Vec<NodeId> = cloned_nodes.iter().map(|n| n.id.clone()).collect();

        let mut nodes: Vec<GraphNode> = self
            .graph
            .nodes()
            .iter()
            .cloned()
            .map(|mut node| {
                node.selected = false;
                node
            })
            .collect();
        let mut edges: Vec<GraphEdge> = self
            .graph
            .edges()
            .iter()
            .cloned()
            .map(|mut edge| {
                edge.selected = false;
                edge
            })
            .collect();
        nodes.extend(cloned_nodes);
        edges.extend(cloned_edges);

        self.graph.set_nodes(nodes);
        self.graph.set_edges(edges);
        self.dirty = true;
        new_ids
    }

    /// Delete selected nodes and edges; edges touching a deleted node go too
    pub fn delete_selected(&mut self) {
        let selected_node_ids: HashSet<String> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.clone())
            .collect();
        let selected_edge_ids: HashSet<String> = self
            .graph
            .edges()
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id.clone())
            .collect();
        if selected_node_ids.is_empty() && selected_edge_ids.is_empty() {
            return;
        }

        self.history.take_snapshot(&self.graph);

        let nodes = self
            .graph
            .nodes()
            .iter()
            .filter(|n| !selected_node_ids.contains(&n.id))
            .cloned()
            .collect();
        let edges = self
            .graph
            .edges()
            .iter()
            .filter(|e| {
                !selected_edge_ids.contains(&e.id)
                    && !selected_node_ids.contains(&e.source)
                    && !selected_node_ids.contains(&e.target)
            })
            .cloned()
            .collect();
        self.graph.set_nodes(nodes);
        self.graph.set_edges(edges);
        self.dirty = true;
    }

    // ---- rotation -------------------------------------------------------

    /// Rotate the selected nodes by ±90 degrees
    pub fn rotate_selected(&mut self, angle: i32) {
        let selected: Vec<(NodeId, i32)> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| n.selected)
            .map(|n| (n.id.clone(), n.data.rotation))
            .collect();
        if selected.is_empty() {
            return;
        }

        self.history.take_snapshot(&self.graph);
        for (id, rotation) in selected {
            let next = (rotation + angle).rem_euclid(360);
            self.graph.update_node(&id, NodeDataPatch::rotation(next));
        }
        self.dirty = true;
    }

    // ---- drag gestures --------------------------------------------------

    /// Record history before a drag starts, so undo restores the pre-drag
    /// positions rather than a mid-drag state.
    pub fn begin_drag(&mut self) {
        self.history.take_snapshot(&self.graph);
        self.dirty = true;
    }

    /// Position update during a drag; history was taken at drag start
    pub fn move_node(&mut self, node_id: &str, position: Position) {
        self.graph.move_node(node_id, position);
    }

    /// Duplicate-on-drag: clone the dragged set in place and re-home
    /// boundary edges onto the clones.
    ///
    /// The clones stay at the original location while the originals move
    /// under the drag. Internal edges stay with the moving originals (their
    /// copies attach the clones); edges with exactly one endpoint in the
    /// dragged set are reassigned to the stationary clone, so the dragged
    /// original leaves its external connectivity behind. Returns
    /// (original, clone) id pairs.
    pub fn begin_duplicate_drag(&mut self, dragged_ids: &[NodeId]) -> Vec<(NodeId, NodeId)> {
        self.history.take_snapshot(&self.graph);

        let dragged: Vec<GraphNode> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| dragged_ids.contains(&n.id))
            .cloned()
            .collect();
        if dragged.is_empty() {
            return Vec::new();
        }

        let all_edges: Vec<GraphEdge> = self.graph.edges().to_vec();
        let (cloned_nodes, cloned_edges) = duplicate_nodes(
            &dragged,
            &all_edges,
            DuplicateOptions::default(),
            &mut self.clone_ids,
        );

        let dragged_set: HashSet<&str> = dragged.iter().map(|n| n.id.as_str()).collect();
        let id_map: HashMap<&str, &str> = dragged
            .iter()
            .zip(&cloned_nodes)
            .map(|(original, clone)| (original.id.as_str(), clone.id.as_str()))
            .collect();

        let mut edges: Vec<GraphEdge> = all_edges
            .iter()
            .cloned()
            .map(|mut edge| {
                let source_dragged = dragged_set.contains(edge.source.as_str());
                let target_dragged = dragged_set.contains(edge.target.as_str());
                // Boundary edge: exactly one endpoint moves away
                if source_dragged != target_dragged {
                    if source_dragged {
                        edge.source = id_map[edge.source.as_str()].to_string();
                    } else {
                        edge.target = id_map[edge.target.as_str()].to_string();
                    }
                }
                edge
            })
            .collect();
        edges.extend(cloned_edges);

        let pairs: Vec<(NodeId, NodeId)> = dragged
            .iter()
            .zip(&cloned_nodes)
            .map(|(original, clone)| (original.id.clone(), clone.id.clone()))
            .collect();

        let mut nodes = self.graph.nodes().to_vec();
        nodes.extend(cloned_nodes);
        self.graph.set_nodes(nodes);
        self.graph.set_edges(edges);
        self.dirty = true;
        pairs
    }

    // ---- parameters -----------------------------------------------------

    /// Set one parameter override, refreshing edge colors that may depend
    /// on it
    pub fn set_parameter(&mut self, node_id: &str, param_id: &str, value: ParamValue) -> Result<()> {
        let Some(node) = self.graph.node(node_id) else {
            return Err(GraphEngineError::UnknownNode(node_id.to_string()));
        };
        let mut parameters = node.data.parameters.clone();
        parameters.insert(param_id.to_string(), value);

        self.history.take_snapshot(&self.graph);
        self.graph
            .update_node(node_id, NodeDataPatch::parameters(parameters));
        self.refresh_edge_colors(node_id);
        self.dirty = true;
        Ok(())
    }

    /// Apply a general instance-data patch (enable/disable, rename, ...)
    pub fn update_node_data(&mut self, node_id: &str, patch: NodeDataPatch) -> Result<()> {
        if self.graph.node(node_id).is_none() {
            return Err(GraphEngineError::UnknownNode(node_id.to_string()));
        }
        self.history.take_snapshot(&self.graph);
        self.graph.update_node(node_id, patch);
        self.dirty = true;
        Ok(())
    }

    /// Recompute cached edge colors around a node whose dtypes may have
    /// changed. Derived data only; never snapshots.
    pub fn refresh_edge_colors(&mut self, node_id: &str) {
        let mut edges = self.graph.edges().to_vec();
        let mut changed = false;
        for edge in edges.iter_mut().filter(|e| e.touches(node_id)) {
            let source_dtype = self
                .graph
                .node(&edge.source)
                .and_then(|n| port_dtype_from_node(n, &edge.source_handle, PortDirection::Output));
            let target_dtype = self
                .graph
                .node(&edge.target)
                .and_then(|n| port_dtype_from_node(n, &edge.target_handle, PortDirection::Input));
            let color = Some(
                edge_color_from_dtypes(source_dtype.as_deref(), target_dtype.as_deref())
                    .to_string(),
            );
            if edge.data.color != color {
                edge.data.color = color;
                changed = true;
            }
        }
        if changed {
            self.graph.set_edges(edges);
        }
    }

    // ---- layout ---------------------------------------------------------

    /// Arrange all nodes hierarchically. No-op below two nodes.
    pub fn auto_layout(&mut self, options: &LayoutOptions) -> bool {
        if self.graph.nodes().len() < 2 {
            return false;
        }
        self.history.take_snapshot(&self.graph);

        let positions = layout_positions(self.graph.nodes(), self.graph.edges(), options);
        let mut nodes = self.graph.nodes().to_vec();
        for (id, position) in positions {
            if let Some(node) = nodes.iter_mut().find(|n| n.id == id) {
                node.position = position;
            }
        }
        self.graph.set_nodes(nodes);
        self.dirty = true;
        true
    }

    // ---- history --------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.graph);
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.graph);
        if changed {
            self.dirty = true;
        }
        changed
    }

    // ---- document lifecycle ---------------------------------------------

    /// Start an empty document. History from the previous document is
    /// discarded; callers confirm with the user first when `is_dirty()`.
    pub fn new_document(&mut self) {
        self.graph.clear_graph();
        self.history.clear();
        self.node_ids.reset();
        self.dirty = false;
    }

    /// Load a flowgraph file, replacing the current document.
    ///
    /// A document that cannot be read at all leaves the current graph
    /// untouched. Returns the import warnings either way; the caller
    /// surfaces them as one aggregated notification.
    pub fn load_grc(&mut self, text: &str, registry: &BlockRegistry) -> Vec<String> {
        let result = parse_grc(text, registry);
        if result.parse_failed {
            return result.warnings;
        }
        self.graph
            .import_graph(result.nodes, result.edges, result.options, result.metadata);
        self.history.clear();
        self.dirty = false;
        result.warnings
    }

    /// Serialize the current document to flowgraph file text
    pub fn save_grc(&mut self) -> String {
        let text = export_grc(
            self.graph.nodes(),
            self.graph.edges(),
            GrcExportOptions {
                options: self.graph.file_options().cloned(),
                metadata: self.graph.file_metadata().cloned(),
            },
        );
        self.dirty = false;
        text
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
