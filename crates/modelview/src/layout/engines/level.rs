//! Level layout engine.
//!
//! Assigns every node a level: its breadth-first distance from the nearest
//! root. Levels advance along the flow direction; nodes sharing a level are
//! spread across it with fixed spacing, each level centered against the
//! widest one.

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};

use modelview_core::{geometry::Point, identifier::NodeId, semantic::LayoutDirection};

use crate::{
    config::LevelLayoutConfig,
    layout::engines::{PositionEngine, Positions},
    structure::DiagramGraph,
};

/// Level layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: LevelLayoutConfig,
}

impl Engine {
    pub fn new(config: LevelLayoutConfig) -> Self {
        Self { config }
    }

    /// Computes the level of every node, in graph node order.
    ///
    /// Roots are the given ids that exist in the graph or, when none are
    /// given, the nodes without incoming edges. If no node qualifies, the
    /// first node is the only root. Nodes not reachable from any root are
    /// placed on the deepest level reached.
    pub fn levels(graph: &DiagramGraph, roots: Option<&[NodeId]>) -> IndexMap<NodeId, usize> {
        let (flow_graph, indices) = Self::flow_graph(graph);

        let explicit_roots: Vec<NodeIndex> = roots
            .unwrap_or_default()
            .iter()
            .filter_map(|id| indices.get(id.as_str()).copied())
            .collect();
        let start_nodes = if !explicit_roots.is_empty() {
            explicit_roots
        } else {
            let root_nodes: Vec<_> = flow_graph
                .node_indices()
                .filter(|&idx| {
                    flow_graph
                        .neighbors_directed(idx, Direction::Incoming)
                        .next()
                        .is_none()
                })
                .collect();
            if root_nodes.is_empty() {
                flow_graph.node_indices().take(1).collect()
            } else {
                root_nodes
            }
        };
        trace!(roots_count = start_nodes.len(); "Level roots selected");

        let mut distances: Vec<Option<usize>> = vec![None; flow_graph.node_count()];
        let mut queue = VecDeque::new();
        for idx in start_nodes {
            if distances[idx.index()].is_none() {
                distances[idx.index()] = Some(0);
                queue.push_back(idx);
            }
        }
        while let Some(idx) = queue.pop_front() {
            let next_level = distances[idx.index()].unwrap_or_default() + 1;
            for child in flow_graph.neighbors(idx) {
                if distances[child.index()].is_none() {
                    distances[child.index()] = Some(next_level);
                    queue.push_back(child);
                }
            }
        }

        let max_level = distances.iter().flatten().copied().max().unwrap_or_default();
        let unreachable = distances.iter().filter(|level| level.is_none()).count();
        if unreachable > 0 {
            debug!(unreachable, max_level; "Unreachable nodes placed on the deepest level");
        }

        flow_graph
            .node_indices()
            .map(|idx| {
                let id = flow_graph[idx].clone();
                (id, distances[idx.index()].unwrap_or(max_level))
            })
            .collect()
    }

    /// Builds the directed graph of the diagram's edges. Self-loops are skipped.
    fn flow_graph(graph: &DiagramGraph) -> (DiGraph<NodeId, ()>, HashMap<&str, NodeIndex>) {
        let mut flow_graph = DiGraph::new();
        let mut indices = HashMap::new();

        for node in graph.nodes() {
            let idx = flow_graph.add_node(node.id().clone());
            indices.insert(node.id().as_str(), idx);
        }

        for edge in graph.edges() {
            if let (Some(&source), Some(&target)) = (
                indices.get(edge.source().as_str()),
                indices.get(edge.target().as_str()),
            ) {
                if source != target {
                    flow_graph.add_edge(source, target, ());
                }
            }
        }

        (flow_graph, indices)
    }
}

impl PositionEngine for Engine {
    fn positions(&self, graph: &DiagramGraph, direction: LayoutDirection) -> Positions {
        let levels = Self::levels(graph, None);

        let mut level_sizes: HashMap<usize, usize> = HashMap::new();
        for level in levels.values() {
            *level_sizes.entry(*level).or_default() += 1;
        }
        let widest = level_sizes.values().copied().max().unwrap_or_default();
        debug!(
            nodes_count = levels.len(),
            levels_count = level_sizes.len(),
            widest;
            "Level layout",
        );

        let mut slots: HashMap<usize, usize> = HashMap::new();
        levels
            .into_iter()
            .map(|(id, level)| {
                let count = level_sizes.get(&level).copied().unwrap_or_default();
                let slot = slots.entry(level).or_default();
                let offset = (widest - count) as f32 * self.config.node_spacing() / 2.0;
                let across = offset + *slot as f32 * self.config.node_spacing();
                let along = level as f32 * self.config.level_spacing();
                *slot += 1;

                let position = match direction {
                    LayoutDirection::Down => Point::new(across, along),
                    LayoutDirection::Right => Point::new(along, across),
                };
                (id, position)
            })
            .collect()
    }
}
