//! Hierarchical layout through a pluggable engine.
//!
//! The adapter converts a [`DiagramGraph`] into an [`EngineGraph`] request,
//! hands it to a [`HierarchicalEngine`] and copies the returned positions and
//! sizes back onto the graph. Containment is preserved: container nodes carry
//! their own layout options, and positions of nested nodes are relative to
//! their parent.

mod request;
mod sugiyama;

use std::collections::{HashMap, HashSet};

use log::{debug, info, trace, warn};
use thiserror::Error;

use modelview_core::{
    geometry::{Insets, Point, Size},
    semantic::LayoutDirection,
};

use crate::{
    ModelViewError,
    config::HierarchicalLayoutConfig,
    structure::{DiagramGraph, GraphNode},
};

pub use request::{
    EngineEdge, EngineGraph, EngineLayoutOptions, EngineNode, HierarchyHandling,
    LAYERED_ALGORITHM, Packing, ROOT_ID,
};
pub use sugiyama::SugiyamaEngine;

/// Failure reported by a hierarchical layout engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine refused or could not process the request.
    #[error("Engine rejected the graph: {0}")]
    Rejected(String),

    /// The engine crashed while computing the layout.
    #[error("Engine panicked: {0}")]
    Panicked(String),
}

/// A layout engine computing positions for a nested graph.
///
/// The engine receives the full request and returns the same tree with `x`
/// and `y` set on every node it positioned. It may also grow node sizes.
/// There are no partial results: either a complete tree or an error.
#[allow(async_fn_in_trait)]
pub trait HierarchicalEngine {
    async fn layout(&self, graph: EngineGraph) -> Result<EngineGraph, EngineError>;
}

/// Converts diagram graphs to engine requests and applies engine responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adapter {
    config: HierarchicalLayoutConfig,
}

impl Adapter {
    pub fn new(config: HierarchicalLayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out the graph with the given engine.
    ///
    /// An empty graph is left untouched without calling the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ModelViewError::Engine`] if the engine fails and
    /// [`ModelViewError::Layout`] if its response cannot be mapped back.
    pub async fn layout<E>(
        &self,
        engine: &E,
        graph: &mut DiagramGraph,
        direction: LayoutDirection,
    ) -> Result<(), ModelViewError>
    where
        E: HierarchicalEngine,
    {
        if graph.is_empty() {
            debug!("Empty graph, skipping hierarchical layout");
            return Ok(());
        }

        let request = self.to_request(graph, direction);
        info!(
            nodes_count = request.node_count(),
            edges_count = request.edges.len();
            "Requesting hierarchical layout",
        );

        let response = engine.layout(request).await?;
        self.apply_response(graph, &response)
    }

    /// Builds the engine request for a graph.
    pub fn to_request(&self, graph: &DiagramGraph, direction: LayoutDirection) -> EngineGraph {
        let mut children_of: HashMap<&str, Vec<&GraphNode>> = HashMap::new();
        for node in graph.nodes() {
            if let Some(parent) = node.parent_id() {
                children_of.entry(parent.as_str()).or_default().push(node);
            }
        }

        let mut emitted = HashSet::new();
        let children = graph
            .top_level_nodes()
            .map(|node| self.engine_node(node, &children_of, direction, &mut emitted))
            .collect();

        let edges = graph
            .edges()
            .iter()
            .filter(|edge| {
                emitted.contains(edge.source().as_str()) && emitted.contains(edge.target().as_str())
            })
            .map(|edge| EngineEdge {
                id: edge.id().to_string(),
                sources: vec![edge.source().to_string()],
                targets: vec![edge.target().to_string()],
            })
            .collect();

        EngineGraph {
            id: ROOT_ID.to_string(),
            layout_options: self.root_options(direction),
            children,
            edges,
        }
    }

    fn engine_node<'a>(
        &self,
        node: &'a GraphNode,
        children_of: &HashMap<&str, Vec<&'a GraphNode>>,
        direction: LayoutDirection,
        emitted: &mut HashSet<&'a str>,
    ) -> EngineNode {
        emitted.insert(node.id().as_str());

        let children = children_of
            .get(node.id().as_str())
            .map(|children| {
                children
                    .iter()
                    .map(|child| self.engine_node(child, children_of, direction, emitted))
                    .collect()
            })
            .unwrap_or_default();
        let layout_options = node
            .is_container()
            .then(|| self.container_options(node, direction));

        EngineNode {
            id: node.id().to_string(),
            width: node.size().width(),
            height: node.size().height(),
            x: node.position().x(),
            y: node.position().y(),
            layout_options,
            children,
        }
    }

    fn root_options(&self, direction: LayoutDirection) -> EngineLayoutOptions {
        EngineLayoutOptions {
            algorithm: LAYERED_ALGORITHM.to_string(),
            direction,
            node_spacing: self.config.node_spacing(),
            layer_spacing: self.config.layer_spacing(),
            padding: Insets::default(),
            packing: Packing::Layered,
            hierarchy_handling: HierarchyHandling::IncludeChildren,
        }
    }

    /// Containers keep their nested nodes below their own content.
    fn container_options(&self, node: &GraphNode, direction: LayoutDirection) -> EngineLayoutOptions {
        let side = self.config.container_padding();
        EngineLayoutOptions {
            padding: Insets::new(node.top_padding(), side, side, side),
            packing: Packing::Dense,
            ..self.root_options(direction)
        }
    }

    /// Copies positions and sizes from an engine response onto the graph.
    ///
    /// Nodes missing from the response keep their position; nodes the graph
    /// does not know are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ModelViewError::Layout`] if the response is not rooted at
    /// [`ROOT_ID`] or contains a non-finite coordinate.
    pub fn apply_response(
        &self,
        graph: &mut DiagramGraph,
        response: &EngineGraph,
    ) -> Result<(), ModelViewError> {
        if response.id != ROOT_ID {
            return Err(ModelViewError::Layout(format!(
                "Engine returned graph `{}` instead of `{ROOT_ID}`",
                response.id
            )));
        }

        let mut applied = 0;
        apply_nodes(graph, &response.children, &mut applied)?;

        if applied < graph.len() {
            debug!(
                applied,
                nodes_count = graph.len();
                "Engine did not position every node",
            );
        }
        Ok(())
    }
}

fn apply_nodes(
    graph: &mut DiagramGraph,
    nodes: &[EngineNode],
    applied: &mut usize,
) -> Result<(), ModelViewError> {
    for engine_node in nodes {
        if ![engine_node.x, engine_node.y, engine_node.width, engine_node.height]
            .iter()
            .all(|value| value.is_finite())
        {
            return Err(ModelViewError::Layout(format!(
                "Engine returned non-finite geometry for node `{}`",
                engine_node.id
            )));
        }

        match graph.node_mut(&engine_node.id) {
            Some(node) => {
                node.set_position(Point::new(engine_node.x, engine_node.y));
                let size = Size::new(engine_node.width, engine_node.height);
                if size != node.size() {
                    trace!(id = engine_node.id.as_str(), size:?; "Engine resized node");
                    node.set_size(size);
                }
                *applied += 1;
            }
            None => {
                warn!(id = engine_node.id.as_str(); "Engine returned unknown node, ignored");
            }
        }

        apply_nodes(graph, &engine_node.children, applied)?;
    }
    Ok(())
}
