//! Self-contained layout engines.
//!
//! These engines position a flat graph synchronously and never fail. They are
//! used for views that only need coarse ordering, not containment.

mod grid;
mod level;

use indexmap::IndexMap;
use log::trace;

use modelview_core::{geometry::Point, identifier::NodeId, semantic::LayoutDirection};

use crate::structure::DiagramGraph;

pub use grid::Engine as GridLayout;
pub use level::Engine as LevelLayout;

/// Top-left position of each node, in graph node order.
pub type Positions = IndexMap<NodeId, Point>;

/// Trait defining the interface for synchronous layout engines.
pub trait PositionEngine {
    /// Calculate a position for every node of the graph.
    ///
    /// Parent links are ignored: every node is placed in one coordinate space.
    fn positions(&self, graph: &DiagramGraph, direction: LayoutDirection) -> Positions;

    /// Calculate positions and store them on the graph's nodes.
    fn apply(&self, graph: &mut DiagramGraph, direction: LayoutDirection) {
        let positions = self.positions(graph, direction);
        for (id, position) in positions {
            if let Some(node) = graph.node_mut(id.as_str()) {
                trace!(id:% = id, position:?; "Node positioned");
                node.set_position(position);
            }
        }
    }
}
