//! Grid layout engine.
//!
//! Places nodes row by row in input order on a square-ish grid with fixed cell
//! size. Edges are not considered.

use log::debug;

use modelview_core::{geometry::Point, semantic::LayoutDirection};

use crate::{
    config::GridLayoutConfig,
    layout::engines::{PositionEngine, Positions},
    structure::DiagramGraph,
};

/// Grid layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: GridLayoutConfig,
}

impl Engine {
    pub fn new(config: GridLayoutConfig) -> Self {
        Self { config }
    }

    /// Number of columns used for `node_count` nodes.
    pub fn columns(node_count: usize) -> usize {
        (node_count as f32).sqrt().ceil() as usize
    }
}

impl PositionEngine for Engine {
    fn positions(&self, graph: &DiagramGraph, _direction: LayoutDirection) -> Positions {
        let columns = Self::columns(graph.len()).max(1);
        debug!(nodes_count = graph.len(), columns; "Grid layout");

        graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let row = i / columns;
                let col = i % columns;
                let position = Point::new(
                    col as f32 * self.config.cell_width(),
                    row as f32 * self.config.cell_height(),
                );
                (node.id().clone(), position)
            })
            .collect()
    }
}
