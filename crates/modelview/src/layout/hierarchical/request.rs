//! Request and response shape exchanged with a hierarchical layout engine.
//!
//! The same tree is used in both directions: the adapter sends nodes with
//! their sizes and the engine returns it with `x`/`y` filled in. Positions are
//! relative to the parent node. Every type serializes with camelCase field
//! names so the tree can be handed to an out-of-process engine unchanged.

use serde::{Deserialize, Serialize};

use modelview_core::{geometry::Insets, semantic::LayoutDirection};

/// Id of the root of every request.
pub const ROOT_ID: &str = "root";

/// Algorithm requested from the engine.
pub const LAYERED_ALGORITHM: &str = "layered";

/// How an engine arranges the children of one scope.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Packing {
    /// Children are ranked into layers along the flow direction.
    #[default]
    Layered,
    /// Children without edges are packed into compact rows.
    Dense,
}

/// Whether edges crossing a container boundary influence the container's layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyHandling {
    /// Edges to nested nodes are lifted to the children they pass through.
    #[default]
    IncludeChildren,
    /// Each scope only considers edges between its direct children.
    SeparateChildren,
}

/// Layout options of one scope: the root or a container node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineLayoutOptions {
    pub algorithm: String,
    pub direction: LayoutDirection,
    pub node_spacing: f32,
    pub layer_spacing: f32,
    /// Space between the scope's border and its children.
    pub padding: Insets,
    pub packing: Packing,
    pub hierarchy_handling: HierarchyHandling,
}

/// A node of the request tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineNode {
    pub id: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Options for laying out the children; set on containers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_options: Option<EngineLayoutOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EngineNode>,
}

/// A directed edge between engine nodes, possibly several levels apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

/// Root of a request or response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineGraph {
    pub id: String,
    pub layout_options: EngineLayoutOptions,
    #[serde(default)]
    pub children: Vec<EngineNode>,
    #[serde(default)]
    pub edges: Vec<EngineEdge>,
}

impl EngineGraph {
    /// Total number of nodes in the tree, excluding the root.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[EngineNode]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        count(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn options() -> EngineLayoutOptions {
        EngineLayoutOptions {
            algorithm: LAYERED_ALGORITHM.to_string(),
            direction: LayoutDirection::Right,
            node_spacing: 50.0,
            layer_spacing: 80.0,
            padding: Insets::new(60.0, 20.0, 20.0, 20.0),
            packing: Packing::Dense,
            hierarchy_handling: HierarchyHandling::IncludeChildren,
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let graph = EngineGraph {
            id: ROOT_ID.to_string(),
            layout_options: options(),
            children: vec![EngineNode {
                id: "A".to_string(),
                width: 180.0,
                height: 40.0,
                x: 0.0,
                y: 0.0,
                layout_options: None,
                children: Vec::new(),
            }],
            edges: vec![EngineEdge {
                id: "e".to_string(),
                sources: vec!["A".to_string()],
                targets: vec!["A".to_string()],
            }],
        };

        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value["id"], "root");
        assert_eq!(value["layoutOptions"]["nodeSpacing"], 50.0);
        assert_eq!(value["layoutOptions"]["hierarchyHandling"], "include_children");
        assert_eq!(value["layoutOptions"]["packing"], "dense");
        assert_eq!(value["layoutOptions"]["direction"], "right");
        assert_eq!(value["layoutOptions"]["padding"], json!([60.0, 20.0, 20.0, 20.0]));
        assert!(value["children"][0].get("layoutOptions").is_none());
        assert!(value["children"][0].get("children").is_none());
        assert_eq!(value["edges"][0]["sources"], json!(["A"]));
    }

    #[test]
    fn test_response_deserializes_with_defaults() {
        let value = json!({
            "id": "root",
            "layoutOptions": {
                "algorithm": "layered",
                "direction": "DOWN",
                "nodeSpacing": 10.0,
                "layerSpacing": 20.0,
                "padding": [0.0, 0.0, 0.0, 0.0],
                "packing": "layered",
                "hierarchyHandling": "separate_children"
            },
            "children": [{"id": "A", "width": 10.0, "height": 5.0, "x": 3.0, "y": 4.0}]
        });

        let graph: EngineGraph = serde_json::from_value(value).unwrap();
        assert_eq!(graph.layout_options.direction, LayoutDirection::Down);
        assert_eq!(
            graph.layout_options.hierarchy_handling,
            HierarchyHandling::SeparateChildren
        );
        assert!(graph.edges.is_empty());
        assert_eq!(graph.children[0].x, 3.0);
        assert!(graph.children[0].children.is_empty());
    }

    #[test]
    fn test_node_count_includes_nested() {
        let leaf = |id: &str| EngineNode {
            id: id.to_string(),
            width: 1.0,
            height: 1.0,
            x: 0.0,
            y: 0.0,
            layout_options: None,
            children: Vec::new(),
        };
        let mut container = leaf("C");
        container.children = vec![leaf("C1"), leaf("C2")];
        let graph = EngineGraph {
            id: ROOT_ID.to_string(),
            layout_options: options(),
            children: vec![container, leaf("D")],
            edges: Vec::new(),
        };
        assert_eq!(graph.node_count(), 4);
    }
}
