//! Output handed to the rendering collaborator.
//!
//! A [`RenderedView`] is a flat, serializable snapshot of a positioned
//! [`DiagramGraph`]: one [`RenderNode`] per node and one [`RenderEdge`] per
//! edge. Field names serialize in camelCase.

use log::debug;
use serde::Serialize;

use modelview_core::{
    geometry::Point,
    semantic::{NodeCategory, PortDirection},
};

use crate::{
    config::Theme,
    structure::{DiagramGraph, GraphEdge, GraphNode, PORT_SEPARATOR, field_name},
};

/// Display data of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNodeData {
    pub name: String,
    pub qualified_name: String,
    pub content: Vec<String>,
    /// Number of port lines following the port separator in `content`.
    pub port_count: usize,
    pub typed_by: Option<String>,
    pub direction: Option<PortDirection>,
    /// Keyword shown in the node header, e.g. `part def`.
    pub keyword: &'static str,
    /// Broad grouping renderers style kinds by.
    pub category: NodeCategory,
    pub is_container: bool,
}

/// A positioned node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    /// Tag of the node kind, `default` for unrecognized types.
    pub node_type: &'static str,
    /// Top-left corner, relative to the parent when `parent_id` is set.
    pub position: Point,
    pub parent_id: Option<String>,
    pub width: f32,
    pub height: f32,
    pub data: RenderNodeData,
}

impl From<&GraphNode> for RenderNode {
    fn from(node: &GraphNode) -> Self {
        let config = node.kind().config();
        Self {
            id: node.id().to_string(),
            node_type: config.tag(),
            position: node.position(),
            parent_id: node.parent_id().map(ToString::to_string),
            width: node.size().width(),
            height: node.size().height(),
            data: RenderNodeData {
                name: node.name().to_string(),
                qualified_name: node.qualified_name().to_string(),
                content: node.content().to_vec(),
                port_count: node.port_count(),
                typed_by: node.typed_by().map(str::to_string),
                direction: node.direction(),
                keyword: config.keyword(),
                category: config.category(),
                is_container: node.is_container(),
            },
        }
    }
}

/// An edge between two rendered nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub edge_type: String,
    pub label: Option<String>,
    pub multiplicity: Option<String>,
}

impl From<&GraphEdge> for RenderEdge {
    fn from(edge: &GraphEdge) -> Self {
        Self {
            id: edge.id().to_string(),
            source: edge.source().to_string(),
            target: edge.target().to_string(),
            edge_type: edge.edge_type().to_string(),
            label: edge.label().map(str::to_string),
            multiplicity: edge.multiplicity().map(str::to_string),
        }
    }
}

/// A laid-out view ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedView {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub theme: Theme,
}

impl RenderedView {
    /// Snapshot a positioned graph.
    pub fn from_graph(graph: &DiagramGraph, theme: Theme) -> Self {
        Self {
            nodes: graph.nodes().iter().map(RenderNode::from).collect(),
            edges: graph.edges().iter().map(RenderEdge::from).collect(),
            theme,
        }
    }

    /// Removes every edge label. Positions are unchanged.
    pub fn strip_edge_labels(&mut self) {
        for edge in &mut self.edges {
            edge.label = None;
        }
    }

    /// Removes content lines whose field name is one of `fields`.
    ///
    /// The port separator is removed together with the last port it
    /// introduces.
    pub fn hide_fields(&mut self, fields: &[String]) {
        if fields.is_empty() {
            return;
        }

        let mut hidden = 0;
        for node in &mut self.nodes {
            let before = node.data.content.len();
            node.data.hide_fields(fields);
            hidden += before - node.data.content.len();
        }
        debug!(hidden; "Hidden content lines");
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

impl RenderNodeData {
    fn hide_fields(&mut self, fields: &[String]) {
        let is_hidden = |line: &str| fields.iter().any(|field| field == field_name(line));
        let separator = if self.port_count > 0 {
            self.content.iter().position(|line| line == PORT_SEPARATOR)
        } else {
            None
        };
        let Some(separator) = separator else {
            self.content.retain(|line| !is_hidden(line.as_str()));
            return;
        };

        let ports = separator + 1..=separator + self.port_count;
        let mut content = Vec::with_capacity(self.content.len());
        let mut kept_separator = None;
        let mut port_count = 0;
        for (idx, line) in self.content.drain(..).enumerate() {
            if idx == separator {
                kept_separator = Some(content.len());
                content.push(line);
            } else if !is_hidden(line.as_str()) {
                if ports.contains(&idx) {
                    port_count += 1;
                }
                content.push(line);
            }
        }

        if port_count == 0 {
            if let Some(idx) = kept_separator {
                content.remove(idx);
            }
        }
        self.content = content;
        self.port_count = port_count;
    }
}
