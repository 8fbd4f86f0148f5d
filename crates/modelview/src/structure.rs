//! Diagram structure built from model symbols.
//!
//! This module turns the flat symbol list of a model into the graph the layout
//! backends work on. Symbols are first classified: structural symbols become
//! nodes, property and port symbols become content lines of their parent
//! node. Node sizes are derived from that content.
//!
//! - [`classify`] - Decides how a symbol is represented.
//! - [`ContentAggregator`] - Collects content lines per parent.
//! - [`sizing`] - Node size calculation.
//! - [`DiagramGraph`] - The sized node and edge sets of one view.

mod classify;
mod content;
mod graph;
pub mod sizing;

pub use classify::{ContentRole, classify};
pub use content::{ContentAggregator, PORT_SEPARATOR, TYPE_SEPARATOR, field_name, format_line};
pub use graph::{DiagramGraph, GraphEdge, GraphNode};
