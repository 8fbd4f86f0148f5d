//! Sugiyama layout engine for nested graphs.
//!
//! Scopes are processed innermost first: every container is laid out on its
//! own and grown to fit its children before its parent scope is arranged.
//! Within a scope, `rust-sugiyama` ranks the connected nodes into layers and
//! orders each layer; sizes, spacing and padding are applied here.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use log::{debug, trace};
use rust_sugiyama::configure::Config;

use modelview_core::{geometry::Point, semantic::LayoutDirection};

use super::{
    EngineError, EngineGraph, EngineLayoutOptions, EngineNode, HierarchicalEngine,
    HierarchyHandling, Packing,
};

/// Vertex spacing requested from rust-sugiyama. Its `x` coordinates are
/// divided by this to recover column units.
const VERTEX_SPACING: f64 = 10.0;

/// The Sugiyama layout engine.
///
/// Runs in-process and completes without suspending. Panics inside
/// `rust-sugiyama` are caught and reported as [`EngineError::Panicked`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SugiyamaEngine;

impl SugiyamaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl HierarchicalEngine for SugiyamaEngine {
    async fn layout(&self, mut graph: EngineGraph) -> Result<EngineGraph, EngineError> {
        let hierarchy = Hierarchy::new(&graph);
        debug!(
            nodes_count = hierarchy.parents.len(),
            links_count = hierarchy.links.len();
            "Applying Sugiyama layout",
        );

        layout_scope(&mut graph.children, &graph.layout_options, None, &hierarchy)?;
        Ok(graph)
    }
}

/// Parent of every node and the node-to-node links of all edges.
struct Hierarchy {
    parents: HashMap<String, Option<String>>,
    links: Vec<(String, String)>,
}

impl Hierarchy {
    fn new(graph: &EngineGraph) -> Self {
        let mut parents = HashMap::new();
        collect_parents(&graph.children, None, &mut parents);

        let links = graph
            .edges
            .iter()
            .flat_map(|edge| {
                edge.sources.iter().flat_map(move |source| {
                    edge.targets
                        .iter()
                        .map(move |target| (source.clone(), target.clone()))
                })
            })
            .filter(|(source, target)| parents.contains_key(source) && parents.contains_key(target))
            .collect();

        Self { parents, links }
    }

    /// Returns the ancestor of `id` (or `id` itself) that is a direct child of
    /// `scope`.
    fn lift<'a>(
        &'a self,
        id: &'a str,
        scope: Option<&str>,
        handling: HierarchyHandling,
    ) -> Option<&'a str> {
        let mut current = id;
        loop {
            let parent = self.parents.get(current)?.as_deref();
            if parent == scope {
                return Some(current);
            }
            if handling == HierarchyHandling::SeparateChildren {
                return None;
            }
            current = parent?;
        }
    }
}

fn collect_parents(
    nodes: &[EngineNode],
    parent: Option<&str>,
    parents: &mut HashMap<String, Option<String>>,
) {
    for node in nodes {
        parents.insert(node.id.clone(), parent.map(str::to_string));
        collect_parents(&node.children, Some(node.id.as_str()), parents);
    }
}

/// Lays out `nodes`, the direct children of `scope`, after laying out their
/// own children.
fn layout_scope(
    nodes: &mut [EngineNode],
    options: &EngineLayoutOptions,
    scope: Option<&str>,
    hierarchy: &Hierarchy,
) -> Result<(), EngineError> {
    for node in nodes.iter_mut() {
        if node.children.is_empty() {
            continue;
        }
        let child_options = node.layout_options.clone().unwrap_or_else(|| options.clone());
        layout_scope(&mut node.children, &child_options, Some(node.id.as_str()), hierarchy)?;
        fit_to_children(node, &child_options);
    }

    if nodes.is_empty() {
        return Ok(());
    }

    let positions = ScopeLayout::new(nodes, options).place(scope, hierarchy)?;
    for (node, position) in nodes.iter_mut().zip(positions) {
        node.x = position.x() + options.padding.left();
        node.y = position.y() + options.padding.top();
    }
    trace!(scope:?, nodes_count = nodes.len(); "Scope laid out");
    Ok(())
}

/// Grows a container so that its children and its padding fit inside it.
fn fit_to_children(node: &mut EngineNode, options: &EngineLayoutOptions) {
    let (max_x, max_y) = node
        .children
        .iter()
        .fold((0.0_f32, 0.0_f32), |(max_x, max_y), child| {
            (max_x.max(child.x + child.width), max_y.max(child.y + child.height))
        });
    node.width = node.width.max(max_x + options.padding.right());
    node.height = node.height.max(max_y + options.padding.bottom());
}

/// Positions of one scope, computed in flow coordinates.
///
/// `along` follows the layout direction (layer to layer) and `across` runs
/// within a layer; they are mapped to `x`/`y` at the end.
struct ScopeLayout<'a> {
    nodes: &'a [EngineNode],
    options: &'a EngineLayoutOptions,
    /// `(across, along)` extent of each node.
    extents: Vec<(f32, f32)>,
    /// `(across, along)` top-left of each placed node.
    slots: Vec<Option<(f32, f32)>>,
    /// End of the placed area along the across axis.
    across_end: f32,
    /// End of the placed area along the flow axis.
    along_end: f32,
}

impl<'a> ScopeLayout<'a> {
    fn new(nodes: &'a [EngineNode], options: &'a EngineLayoutOptions) -> Self {
        let extents = nodes
            .iter()
            .map(|node| match options.direction {
                LayoutDirection::Down => (node.width, node.height),
                LayoutDirection::Right => (node.height, node.width),
            })
            .collect();
        Self {
            nodes,
            options,
            extents,
            slots: vec![None; nodes.len()],
            across_end: 0.0,
            along_end: 0.0,
        }
    }

    fn place(
        mut self,
        scope: Option<&str>,
        hierarchy: &Hierarchy,
    ) -> Result<Vec<Point>, EngineError> {
        let links = self.scope_links(scope, hierarchy);
        if !links.is_empty() {
            self.place_connected(&links)?;
        }
        self.place_isolated();

        let direction = self.options.direction;
        Ok(self
            .slots
            .iter()
            .map(|slot| {
                let (across, along) = slot.unwrap_or_default();
                match direction {
                    LayoutDirection::Down => Point::new(across, along),
                    LayoutDirection::Right => Point::new(along, across),
                }
            })
            .collect())
    }

    /// Links between the scope's nodes, by index, without self-loops or duplicates.
    fn scope_links(&self, scope: Option<&str>, hierarchy: &Hierarchy) -> Vec<(usize, usize)> {
        let index: HashMap<&str, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id.as_str(), idx))
            .collect();
        let handling = self.options.hierarchy_handling;

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for (source, target) in &hierarchy.links {
            let lifted = (
                hierarchy
                    .lift(source, scope, handling)
                    .and_then(|id| index.get(id)),
                hierarchy
                    .lift(target, scope, handling)
                    .and_then(|id| index.get(id)),
            );
            if let (Some(&source), Some(&target)) = lifted {
                if source != target && seen.insert((source, target)) {
                    links.push((source, target));
                }
            }
        }
        links
    }

    fn place_connected(&mut self, links: &[(usize, usize)]) -> Result<(), EngineError> {
        // rust-sugiyama creates a vertex for every index up to the largest,
        // so connected nodes are renumbered densely.
        let mut connected: Vec<usize> = links.iter().flat_map(|&(s, t)| [s, t]).collect();
        connected.sort_unstable();
        connected.dedup();
        let vertex_of: HashMap<usize, u32> = connected
            .iter()
            .enumerate()
            .map(|(vertex, &idx)| (idx, vertex as u32))
            .collect();
        let edges: Vec<(u32, u32)> = links
            .iter()
            .map(|(s, t)| (vertex_of[s], vertex_of[t]))
            .collect();

        debug!(
            nodes_count = connected.len(),
            edges_count = edges.len();
            "Running rust-sugiyama",
        );

        for component in run_sugiyama(edges)? {
            let members: Vec<(usize, f64, f64)> = component
                .into_iter()
                .filter_map(|(vertex, x, y)| connected.get(vertex).map(|&idx| (idx, x, y)))
                .collect();
            if !members.is_empty() {
                self.place_component(&members, links);
            }
        }
        Ok(())
    }

    /// Places one connected component to the side of everything placed so far.
    fn place_component(&mut self, members: &[(usize, f64, f64)], links: &[(usize, usize)]) {
        let layers = layers_of(members, links);
        let node_spacing = self.options.node_spacing;

        let max_across = members
            .iter()
            .map(|&(idx, _, _)| self.extents[idx].0)
            .fold(0.0_f32, f32::max);
        let column_width = max_across + node_spacing;

        let mut placed = Vec::with_capacity(members.len());
        let mut along = 0.0;
        for layer in &layers {
            let mut previous_end: Option<f32> = None;
            let mut layer_depth = 0.0_f32;
            for &(idx, x) in layer {
                let (extent_across, extent_along) = self.extents[idx];
                let ideal = x as f32 * column_width;
                let across = match previous_end {
                    Some(end) => ideal.max(end + node_spacing),
                    None => ideal,
                };
                previous_end = Some(across + extent_across);
                layer_depth = layer_depth.max(extent_along);
                placed.push((idx, across, along));
            }
            along += layer_depth + self.options.layer_spacing;
        }

        let min_across = placed
            .iter()
            .map(|&(_, across, _)| across)
            .fold(f32::INFINITY, f32::min);
        let shift = self.across_start() - min_across;
        for (idx, across, along) in placed {
            self.put(idx, across + shift, along);
        }
    }

    /// Places nodes not positioned by rust-sugiyama.
    fn place_isolated(&mut self) {
        let isolated: Vec<usize> = (0..self.nodes.len())
            .filter(|&idx| self.slots[idx].is_none())
            .collect();
        if isolated.is_empty() {
            return;
        }

        match self.options.packing {
            Packing::Layered => {
                for idx in isolated {
                    let across = self.across_start();
                    self.put(idx, across, 0.0);
                }
            }
            Packing::Dense => {
                let spacing = self.options.node_spacing;
                let columns = (isolated.len() as f32).sqrt().ceil() as usize;
                let mut along = if self.along_end > 0.0 {
                    self.along_end + self.options.layer_spacing
                } else {
                    0.0
                };
                for row in isolated.chunks(columns.max(1)) {
                    let mut across = 0.0;
                    let mut row_depth = 0.0_f32;
                    for &idx in row {
                        let (extent_across, extent_along) = self.extents[idx];
                        self.put(idx, across, along);
                        across += extent_across + spacing;
                        row_depth = row_depth.max(extent_along);
                    }
                    along += row_depth + spacing;
                }
            }
        }
    }

    /// First free position along the across axis.
    fn across_start(&self) -> f32 {
        if self.slots.iter().any(Option::is_some) {
            self.across_end + self.options.node_spacing
        } else {
            0.0
        }
    }

    fn put(&mut self, idx: usize, across: f32, along: f32) {
        let (extent_across, extent_along) = self.extents[idx];
        self.slots[idx] = Some((across, along));
        self.across_end = self.across_end.max(across + extent_across);
        self.along_end = self.along_end.max(along + extent_along);
    }
}

/// Groups the members of a component into layers ordered along the flow,
/// each sorted by column.
///
/// Layers are the distinct `y` values reported by rust-sugiyama. Their order
/// is chosen so that most links point forward.
fn layers_of(members: &[(usize, f64, f64)], links: &[(usize, usize)]) -> Vec<Vec<(usize, f64)>> {
    let mut ys: Vec<f64> = members.iter().map(|&(_, _, y)| y).collect();
    ys.sort_by(f64::total_cmp);
    ys.dedup_by(|a, b| (*a - *b).abs() < 1e-6);

    let layer_of = |y: f64| {
        ys.iter()
            .position(|candidate| (candidate - y).abs() < 1e-6)
            .unwrap_or_default()
    };
    let member_layer: HashMap<usize, usize> = members
        .iter()
        .map(|&(idx, _, y)| (idx, layer_of(y)))
        .collect();

    let (forward, backward) = links.iter().fold((0, 0), |(forward, backward), (s, t)| {
        match (member_layer.get(s), member_layer.get(t)) {
            (Some(s), Some(t)) if s < t => (forward + 1, backward),
            (Some(s), Some(t)) if s > t => (forward, backward + 1),
            _ => (forward, backward),
        }
    });

    let mut layers: Vec<Vec<(usize, f64)>> = vec![Vec::new(); ys.len()];
    for &(idx, x, y) in members {
        layers[layer_of(y)].push((idx, x / VERTEX_SPACING));
    }
    if backward > forward {
        layers.reverse();
    }
    for layer in &mut layers {
        layer.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    }
    layers
}

/// Runs rust-sugiyama, returning `(vertex, x, y)` per connected component.
fn run_sugiyama(edges: Vec<(u32, u32)>) -> Result<Vec<Vec<(usize, f64, f64)>>, EngineError> {
    let layouts = std::panic::catch_unwind(move || {
        let config = Config {
            minimum_length: 1,
            vertex_spacing: VERTEX_SPACING,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&edges, &config)
    });

    match layouts {
        Ok(results) => Ok(results
            .into_iter()
            .map(|(coords, _, _)| {
                coords
                    .into_iter()
                    .map(|(vertex, (x, y))| (vertex, x, y))
                    .collect()
            })
            .collect()),
        Err(err) => {
            let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                panic_msg.clone()
            } else if let Some(panic_msg) = err.downcast_ref::<&str>() {
                (*panic_msg).to_string()
            } else {
                "unknown error".to_string()
            };
            Err(EngineError::Panicked(format!("rust-sugiyama: {message}")))
        }
    }
}
