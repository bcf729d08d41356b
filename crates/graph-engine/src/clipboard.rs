//! Clipboard state and node duplication
//!
//! `duplicate_nodes` is the one cloning primitive shared by paste and
//! duplicate-on-drag: it clones a node set plus the edges internal to it,
//! with fresh ids and remapped endpoints. Edges with exactly one endpoint in
//! the set are deliberately not cloned here; callers that want the clones to
//! inherit external connectivity remap those edges themselves.

use crate::id::CloneIdGenerator;
use crate::types::{GraphEdge, GraphNode, GraphSnapshot, Position};
use std::collections::{HashMap, HashSet};

/// Options for [`duplicate_nodes`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateOptions {
    /// Offset applied to every clone's position
    pub position_offset: Position,
    /// Selection state applied to every clone
    pub selected: bool,
}

/// Clone a set of nodes and their internal edges.
///
/// Every clone gets a fresh id from the generator; `instance_name` tracks
/// the new id. Source nodes are not touched.
pub fn duplicate_nodes(
    source_nodes: &[GraphNode],
    all_edges: &[GraphEdge],
    options: DuplicateOptions,
    ids: &mut CloneIdGenerator,
) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    let mut id_map: HashMap<String, String> = HashMap::new();
    for node in source_nodes {
        id_map.insert(node.id.clone(), ids.next());
    }
    let source_ids: HashSet<&str> = source_nodes.iter().map(|n| n.id.as_str()).collect();

    let cloned_nodes: Vec<GraphNode> = source_nodes
        .iter()
        .map(|node| {
            let new_id = id_map[&node.id].clone();
            let mut clone = node.clone();
            clone.id = new_id.clone();
            clone.position = node.position.offset_by(options.position_offset);
            clone.selected = options.selected;
            clone.data.instance_name = new_id;
            clone
        })
        .collect();

    let cloned_edges: Vec<GraphEdge> = all_edges
        .iter()
        .filter(|edge| {
            source_ids.contains(edge.source.as_str()) && source_ids.contains(edge.target.as_str())
        })
        .map(|edge| {
            let mut clone = edge.clone();
            clone.id = ids.next();
            clone.source = id_map[&edge.source].clone();
            clone.target = id_map[&edge.target].clone();
            clone.selected = options.selected;
            clone
        })
        .collect();

    (cloned_nodes, cloned_edges)
}

/// Holds the last copied/cut node set as a deep, independent copy
#[derive(Default)]
pub struct ClipboardStore {
    clipboard: Option<GraphSnapshot>,
}

impl ClipboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents
    pub fn set(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) {
        self.clipboard = Some(GraphSnapshot { nodes, edges });
    }

    /// Current contents, if any
    pub fn get(&self) -> Option<&GraphSnapshot> {
        self.clipboard.as_ref()
    }

    /// Whether the clipboard holds at least one node
    pub fn has_content(&self) -> bool {
        self.clipboard
            .as_ref()
            .is_some_and(|c| !c.nodes.is_empty())
    }

    /// Empty the clipboard
    pub fn clear(&mut self) {
        self.clipboard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_edge, test_node};

    #[test]
    fn test_duplicate_assigns_fresh_ids_and_tracks_instance_name() {
        let nodes = vec![test_node("a"), test_node("b")];
        let mut ids = CloneIdGenerator::with_epoch(7);

        let (clones, _) = duplicate_nodes(&nodes, &[], DuplicateOptions::default(), &mut ids);

        assert_eq!(clones.len(), 2);
        assert_ne!(clones[0].id, "a");
        assert_ne!(clones[1].id, "b");
        assert_ne!(clones[0].id, clones[1].id);
        assert_eq!(clones[0].data.instance_name, clones[0].id);
    }

    #[test]
    fn test_duplicate_clones_internal_edges_only() {
        let nodes = vec![test_node("a"), test_node("b")];
        let edges = vec![
            test_edge("a", "b"),       // internal
            test_edge("a", "outside"), // boundary, dropped
            test_edge("outside", "b"), // boundary, dropped
        ];
        let mut ids = CloneIdGenerator::with_epoch(7);

        let (clones, cloned_edges) =
            duplicate_nodes(&nodes, &edges, DuplicateOptions::default(), &mut ids);

        assert_eq!(cloned_edges.len(), 1);
        assert_eq!(cloned_edges[0].source, clones[0].id);
        assert_eq!(cloned_edges[0].target, clones[1].id);
    }

    #[test]
    fn test_duplicate_applies_offset_and_selection() {
        let mut node = test_node("a");
        node.position = Position::new(100.0, 50.0);
        let mut ids = CloneIdGenerator::with_epoch(7);

        let (clones, _) = duplicate_nodes(
            &[node],
            &[],
            DuplicateOptions {
                position_offset: Position::new(20.0, 20.0),
                selected: true,
            },
            &mut ids,
        );

        assert_eq!(clones[0].position, Position::new(120.0, 70.0));
        assert!(clones[0].selected);
    }

    #[test]
    fn test_duplicate_leaves_sources_untouched() {
        let nodes = vec![test_node("a")];
        let mut ids = CloneIdGenerator::with_epoch(7);
        let (_, _) = duplicate_nodes(&nodes, &[], DuplicateOptions::default(), &mut ids);
        assert_eq!(nodes[0].id, "a");
        assert_eq!(nodes[0].data.instance_name, "a");
    }

    #[test]
    fn test_clipboard_store() {
        let mut clipboard = ClipboardStore::new();
        assert!(!clipboard.has_content());

        clipboard.set(vec![test_node("a")], Vec::new());
        assert!(clipboard.has_content());
        assert_eq!(clipboard.get().unwrap().nodes.len(), 1);

        clipboard.clear();
        assert!(clipboard.get().is_none());
    }
}
