//! Auto-layout adapter
//!
//! Translates the graph into a hierarchical layout request for `dugong`
//! (a dagre-style layered layout) and maps the returned coordinates back.
//! Nodes enter the layout as opaque fixed-size boxes; the layout engine
//! positions them from their centers, so results are translated to the
//! graph's top-left-corner convention before being applied.

use dugong::graphlib::{Graph, GraphOptions};
use dugong::{EdgeLabel, GraphLabel, NodeLabel, RankDir};

use crate::types::{GraphEdge, GraphNode, NodeId, Position};

/// Default layout box width when real node dimensions are unknown
pub const DEFAULT_NODE_WIDTH: f64 = 150.0;
/// Default layout box height when real node dimensions are unknown
pub const DEFAULT_NODE_HEIGHT: f64 = 50.0;
/// Default separation between ranks
pub const DEFAULT_RANK_SEP: f64 = DEFAULT_NODE_WIDTH + 150.0;
/// Default separation between nodes within a rank
pub const DEFAULT_NODE_SEP: f64 = DEFAULT_NODE_HEIGHT + 200.0;

/// Flow direction of the hierarchical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    TopToBottom,
    #[default]
    LeftToRight,
    BottomToTop,
    RightToLeft,
}

impl LayoutDirection {
    fn rank_dir(self) -> RankDir {
        match self {
            LayoutDirection::TopToBottom => RankDir::TB,
            LayoutDirection::LeftToRight => RankDir::LR,
            LayoutDirection::BottomToTop => RankDir::BT,
            LayoutDirection::RightToLeft => RankDir::RL,
        }
    }
}

/// Tunables for the layout request
#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    pub node_width: f64,
    pub node_height: f64,
    pub rank_sep: f64,
    pub node_sep: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::default(),
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            rank_sep: DEFAULT_RANK_SEP,
            node_sep: DEFAULT_NODE_SEP,
        }
    }
}

/// Compute hierarchical positions for every node.
///
/// Only positions are produced; callers apply them to the store. A node the
/// layout engine fails to place keeps its current position.
pub fn layout_positions(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    options: &LayoutOptions,
) -> Vec<(NodeId, Position)> {
    let mut graph: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        directed: true,
    });
    graph.set_graph(GraphLabel {
        rankdir: options.direction.rank_dir(),
        nodesep: options.node_sep,
        ranksep: options.rank_sep,
        marginx: 8.0,
        marginy: 8.0,
        ..Default::default()
    });

    for node in nodes {
        graph.set_node(
            node.id.clone(),
            NodeLabel {
                width: options.node_width,
                height: options.node_height,
                ..Default::default()
            },
        );
    }
    for (index, edge) in edges.iter().enumerate() {
        graph.set_edge_named(
            edge.source.clone(),
            edge.target.clone(),
            Some(format!("e{index}")),
            Some(EdgeLabel::default()),
        );
    }

    dugong::layout_dagreish(&mut graph);

    nodes
        .iter()
        .map(|node| {
            let position = graph
                .node(&node.id)
                .and_then(|label| match (label.x, label.y) {
                    (Some(x), Some(y)) => Some(Position::new(
                        // Translate from center-based to top-left coordinates
                        x - options.node_width / 2.0,
                        y - options.node_height / 2.0,
                    )),
                    _ => None,
                })
                .unwrap_or(node.position);
            (node.id.clone(), position)
        })
        .collect()
}
