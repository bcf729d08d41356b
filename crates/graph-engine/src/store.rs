//! Graph store: the single source of truth for the editable graph
//!
//! The store owns the node and edge lists and exposes a narrow mutation API.
//! Every mutation bumps a generation counter and notifies subscribers, which
//! is how any UI layer binds to the store without the core assuming a
//! particular binding mechanism. No store operation records history; callers
//! performing undoable actions snapshot through the temporal store first.

use crate::grc::model::{GrcMetadata, GrcOptionsBlock};
use crate::types::{GraphEdge, GraphNode, GraphSnapshot, NodeDataPatch, Position};

/// Subscription handle returned by [`GraphStore::subscribe`]
pub type ListenerId = usize;

type Listener = Box<dyn Fn(&[GraphNode], &[GraphEdge])>;

/// Owns the canonical node and edge lists
#[derive(Default)]
pub struct GraphStore {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    /// File options carried over from the last import, for save round-trips
    file_options: Option<GrcOptionsBlock>,
    /// File metadata carried over from the last import
    file_metadata: Option<GrcMetadata>,
    generation: u64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: ListenerId,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nodes
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Current edges
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Find a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find an edge by id
    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// File options retained from the last import, if any
    pub fn file_options(&self) -> Option<&GrcOptionsBlock> {
        self.file_options.as_ref()
    }

    /// File metadata retained from the last import, if any
    pub fn file_metadata(&self) -> Option<&GrcMetadata> {
        self.file_metadata.as_ref()
    }

    /// Monotonic change counter; bumps on every mutation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Register a change listener, invoked after every mutation
    pub fn subscribe(&mut self, listener: impl Fn(&[GraphNode], &[GraphEdge]) + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    fn touch(&mut self) {
        self.generation += 1;
        for (_, listener) in &self.listeners {
            listener(&self.nodes, &self.edges);
        }
    }

    /// Replace the node list
    pub fn set_nodes(&mut self, nodes: Vec<GraphNode>) {
        self.nodes = nodes;
        self.touch();
    }

    /// Replace the edge list
    pub fn set_edges(&mut self, edges: Vec<GraphEdge>) {
        self.edges = edges;
        self.touch();
    }

    /// Append a node
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.push(node);
        self.touch();
    }

    /// Shallow-merge a patch into the node's instance data
    pub fn update_node(&mut self, id: &str, patch: NodeDataPatch) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            patch.apply_to(&mut node.data);
            self.touch();
        }
    }

    /// Move a node to a new position
    pub fn move_node(&mut self, id: &str, position: Position) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.position = position;
            self.touch();
        }
    }

    /// Remove a node; edges referencing it are left alone
    pub fn remove_node(&mut self, id: &str) {
        self.nodes.retain(|n| n.id != id);
        self.touch();
    }

    /// Append an edge
    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
        self.touch();
    }

    /// Remove an edge by id
    pub fn remove_edge(&mut self, id: &str) {
        self.edges.retain(|e| e.id != id);
        self.touch();
    }

    /// Remove a node together with every edge that touches it
    pub fn delete_node_and_edges(&mut self, node_id: &str) {
        self.nodes.retain(|n| n.id != node_id);
        self.edges.retain(|e| !e.touches(node_id));
        self.touch();
    }

    /// Replace the whole graph, retaining the file's unmodeled sections
    pub fn import_graph(
        &mut self,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        file_options: Option<GrcOptionsBlock>,
        file_metadata: Option<GrcMetadata>,
    ) {
        self.nodes = nodes;
        self.edges = edges;
        self.file_options = file_options;
        self.file_metadata = file_metadata;
        self.touch();
    }

    /// Replace the graph with an empty one
    pub fn clear_graph(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.file_options = None;
        self.file_metadata = None;
        self.touch();
    }

    /// Deep copy of the current node/edge state
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Restore a snapshot. File options/metadata are not part of history.
    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.touch();
    }
}
