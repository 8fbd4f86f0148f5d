//! Diagram graph built from model symbols.
//!
//! [`DiagramGraph::build`] turns a flat list of symbols and relationships into
//! the sized node set and the edge set every layout backend works on:
//!
//! 1. symbols whose type fails the view's node filter are dropped;
//! 2. the remaining symbols are classified; property and port symbols become
//!    content lines of their parent;
//! 3. every structural symbol becomes a [`GraphNode`] with merged content, a
//!    container flag and a computed size;
//! 4. parent links are kept only when the parent is itself a retained node;
//! 5. relationships become [`GraphEdge`]s when they pass the edge filter and
//!    both endpoints are retained nodes.
//!
//! Nothing in this process fails: malformed input is dropped or defaulted.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

use modelview_core::{
    geometry::{Point, Size},
    identifier::NodeId,
    semantic::{NodeKind, PortDirection, Relationship, Symbol, ViewConfig},
};

use super::{ContentAggregator, classify, sizing};

/// A structural node of the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    id: NodeId,
    kind: NodeKind,
    name: String,
    qualified_name: String,
    parent_id: Option<NodeId>,
    content: Vec<String>,
    port_count: usize,
    is_container: bool,
    size: Size,
    top_padding: f32,
    position: Point,
    typed_by: Option<String>,
    direction: Option<PortDirection>,
}

impl GraphNode {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Id of the containing node, if it is part of the graph.
    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    /// Display lines: properties, port separator and ports, then features.
    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// Number of port lines following the port separator in the content.
    pub fn port_count(&self) -> usize {
        self.port_count
    }

    /// Whether other nodes are nested inside this node.
    pub fn is_container(&self) -> bool {
        self.is_container
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Space reserved above nested nodes; only meaningful for containers.
    pub fn top_padding(&self) -> f32 {
        self.top_padding
    }

    /// Top-left corner, relative to the parent node when nested.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn typed_by(&self) -> Option<&str> {
        self.typed_by.as_deref()
    }

    pub fn direction(&self) -> Option<PortDirection> {
        self.direction
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

/// A relationship realized between two retained nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    id: String,
    source: NodeId,
    target: NodeId,
    edge_type: String,
    label: Option<String>,
    multiplicity: Option<String>,
}

impl GraphEdge {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }

    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn multiplicity(&self) -> Option<&str> {
        self.multiplicity.as_deref()
    }
}

/// The sized node set and edge set of one view.
///
/// Nodes keep the input order of their symbols. A graph is built fresh for
/// every layout call and owned by that call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<NodeId, usize>,
    edges: Vec<GraphEdge>,
}

impl DiagramGraph {
    /// Builds the graph for a view.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelview::structure::DiagramGraph;
    /// use modelview_core::semantic::{Relationship, Symbol, ViewConfig, ViewType};
    ///
    /// let symbols = [
    ///     Symbol::new("A", "Pkg::A", "PartDefinition"),
    ///     Symbol::new("B", "Pkg::B", "PartDefinition"),
    /// ];
    /// let relationships = [Relationship::new("specialization", "Pkg::B", "Pkg::A")];
    ///
    /// let graph = DiagramGraph::build(&symbols, &relationships, &ViewConfig::new(ViewType::General));
    /// assert_eq!(graph.nodes().len(), 2);
    /// assert_eq!(graph.edges().len(), 1);
    /// assert_eq!(graph.edges()[0].source(), "Pkg__B");
    /// ```
    pub fn build(symbols: &[Symbol], relationships: &[Relationship], view: &ViewConfig) -> Self {
        let show_nesting = view.show_nesting();

        let retained: Vec<&Symbol> = symbols
            .iter()
            .filter(|symbol| view.includes_node_type(symbol.node_type()))
            .collect();
        debug!(
            symbols_count = symbols.len(),
            retained_count = retained.len();
            "Filtered symbols by node type",
        );

        let mut aggregator = ContentAggregator::new();
        let mut structural = Vec::new();
        for symbol in retained {
            let role = classify(symbol.node_type());
            if role.is_structural() {
                structural.push(symbol);
            } else {
                aggregator.add(symbol, role);
            }
        }

        let mut graph = Self::default();
        for symbol in &structural {
            let id = NodeId::from_qualified_name(symbol.qualified_name());
            if graph.index.contains_key(&id) {
                warn!(
                    id = id.as_str(),
                    qualified_name = symbol.qualified_name();
                    "Duplicate node id, keeping the first symbol",
                );
                continue;
            }
            graph.index.insert(id.clone(), graph.nodes.len());
            graph.nodes.push(GraphNode {
                id,
                kind: NodeKind::from_tag(symbol.node_type()),
                name: symbol.name().to_string(),
                qualified_name: symbol.qualified_name().to_string(),
                parent_id: symbol.parent().map(NodeId::from_qualified_name),
                content: aggregator.merged_content(symbol),
                port_count: aggregator.ports(symbol.qualified_name()).len(),
                is_container: false,
                size: Size::default(),
                top_padding: 0.0,
                position: Point::default(),
                typed_by: symbol.typed_by().map(str::to_string),
                direction: symbol.direction(),
            });
        }

        graph.link_parents(show_nesting);

        let containers: HashSet<NodeId> = graph
            .nodes
            .iter()
            .filter_map(|node| node.parent_id.clone())
            .collect();
        for node in &mut graph.nodes {
            node.is_container = containers.contains(&node.id);
            let node_size = sizing::calculate(&node.content, node.is_container);
            node.size = node_size.size();
            node.top_padding = node_size.top_padding();
        }

        graph.edges = relationships
            .iter()
            .enumerate()
            .filter_map(|(idx, relationship)| graph.realize_edge(idx, relationship, view))
            .collect();

        debug!(
            nodes_count = graph.nodes.len(),
            edges_count = graph.edges.len(),
            containers_count = containers.len();
            "Graph built",
        );
        trace!(graph:?; "Built graph");

        graph
    }

    /// Keeps parent links that point at retained nodes and do not form cycles.
    fn link_parents(&mut self, show_nesting: bool) {
        for idx in 0..self.nodes.len() {
            let Some(parent_id) = &self.nodes[idx].parent_id else {
                continue;
            };
            if !show_nesting
                || !self.index.contains_key(parent_id)
                || parent_id == &self.nodes[idx].id
            {
                trace!(node = self.nodes[idx].id.as_str(); "Parent link dropped");
                self.nodes[idx].parent_id = None;
            }
        }

        // Cyclic parent chains cannot be nested; the first node found on a
        // cycle is lifted to the top level, which breaks the cycle.
        for idx in 0..self.nodes.len() {
            if self.parent_chain_cycles(idx) {
                warn!(node = self.nodes[idx].id.as_str(); "Cyclic containment, node moved to top level");
                self.nodes[idx].parent_id = None;
            }
        }
    }

    fn parent_chain_cycles(&self, start: usize) -> bool {
        let mut current = start;
        for _ in 0..self.nodes.len() {
            let Some(parent_idx) = self.nodes[current]
                .parent_id
                .as_ref()
                .and_then(|parent| self.index.get(parent))
            else {
                return false;
            };
            if *parent_idx == start {
                return true;
            }
            current = *parent_idx;
        }
        false
    }

    fn realize_edge(
        &self,
        idx: usize,
        relationship: &Relationship,
        view: &ViewConfig,
    ) -> Option<GraphEdge> {
        if !view.includes_edge_type(relationship.relation_type()) {
            return None;
        }
        let source = NodeId::from_qualified_name(relationship.source());
        let target = NodeId::from_qualified_name(relationship.target());
        if !self.contains(source.as_str()) || !self.contains(target.as_str()) {
            trace!(relationship:% = relationship; "Edge endpoint not in graph, edge dropped");
            return None;
        }
        Some(GraphEdge {
            id: format!("{}-{source}-{target}-{idx}", relationship.relation_type()),
            source,
            target,
            edge_type: relationship.relation_type().to_string(),
            label: relationship.label().map(str::to_string),
            multiplicity: relationship.multiplicity().map(str::to_string),
        })
    }

    /// All nodes in input order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.index.get(id).map(|&idx| &mut self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Top padding of a container node; `None` for leaves and unknown ids.
    pub fn container_top_padding(&self, id: &str) -> Option<f32> {
        self.node(id)
            .filter(|node| node.is_container())
            .map(GraphNode::top_padding)
    }

    /// Nodes without a parent, in input order.
    pub fn top_level_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| node.parent_id.is_none())
    }

    /// Nodes directly nested in `id`, in input order.
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.parent_id.as_ref().is_some_and(|parent| parent == id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
