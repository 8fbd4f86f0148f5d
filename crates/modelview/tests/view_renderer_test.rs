//! Integration tests for the ViewRenderer API
//!
//! These tests drive the full pipeline: graph building, backend selection,
//! layout and post-processing.

use std::cell::Cell;

use futures::executor::block_on;

use modelview::{
    ModelViewError, ViewRenderer,
    config::{AppConfig, LayoutBackend},
    layout::{
        EngineError, HierarchicalEngine,
        hierarchical::{EngineGraph, EngineNode},
    },
    semantic::{LayoutDirection, PortDirection, Relationship, Symbol, ViewConfig, ViewType},
};

/// Engine counting calls and stacking top-level nodes vertically.
#[derive(Default)]
struct StackingEngine {
    calls: Cell<usize>,
}

impl HierarchicalEngine for StackingEngine {
    async fn layout(&self, mut graph: EngineGraph) -> Result<EngineGraph, EngineError> {
        self.calls.set(self.calls.get() + 1);
        let mut y = 0.0;
        for node in &mut graph.children {
            node.y = y;
            y += node.height + 10.0;
        }
        Ok(graph)
    }
}

struct FailingEngine;

impl HierarchicalEngine for FailingEngine {
    async fn layout(&self, _graph: EngineGraph) -> Result<EngineGraph, EngineError> {
        Err(EngineError::Rejected("engine offline".to_string()))
    }
}

/// Engine answering with a tree rooted somewhere else.
struct MisrootedEngine;

impl HierarchicalEngine for MisrootedEngine {
    async fn layout(&self, mut graph: EngineGraph) -> Result<EngineGraph, EngineError> {
        graph.id = "elsewhere".to_string();
        Ok(graph)
    }
}

fn vehicle_model() -> (Vec<Symbol>, Vec<Relationship>) {
    let symbols = vec![
        Symbol::new("Vehicle", "Demo::Vehicle", "PartDefinition"),
        Symbol::new("mass", "Demo::Vehicle::mass", "AttributeUsage")
            .with_parent("Demo::Vehicle")
            .with_typed_by("ISQ::MassValue"),
        Symbol::new("fuelIn", "Demo::Vehicle::fuelIn", "PortUsage")
            .with_parent("Demo::Vehicle")
            .with_direction(PortDirection::In),
        Symbol::new("engine", "Demo::Vehicle::engine", "PartUsage")
            .with_parent("Demo::Vehicle")
            .with_typed_by("Demo::Engine"),
        Symbol::new("wheels", "Demo::Vehicle::wheels", "PartUsage")
            .with_parent("Demo::Vehicle")
            .with_typed_by("Demo::Wheel"),
        Symbol::new("Engine", "Demo::Engine", "PartDefinition"),
        Symbol::new("Wheel", "Demo::Wheel", "PartDefinition"),
    ];
    let relationships = vec![
        Relationship::new("typing", "Demo::Vehicle::engine", "Demo::Engine").with_label("defined by"),
        Relationship::new("typing", "Demo::Vehicle::wheels", "Demo::Wheel")
            .with_label("defined by")
            .with_multiplicity("4"),
        Relationship::new("connection", "Demo::Vehicle::engine", "Demo::Vehicle::wheels"),
    ];
    (symbols, relationships)
}

fn action_flow() -> (Vec<Symbol>, Vec<Relationship>) {
    let symbols = ["Start", "Drive", "Park"]
        .iter()
        .map(|name| Symbol::new(*name, format!("Trip::{name}"), "ActionUsage"))
        .collect();
    let relationships = vec![
        Relationship::new("succession", "Trip::Start", "Trip::Drive"),
        Relationship::new("succession", "Trip::Drive", "Trip::Park"),
    ];
    (symbols, relationships)
}

fn config_from_toml(source: &str) -> AppConfig {
    toml::from_str(source).expect("Failed to parse config")
}

/// Configuration routing action flow views to the level backend.
fn level_flow_config() -> AppConfig {
    config_from_toml(
        r#"
        [layout.backends]
        action_flow = "level"
        "#,
    )
}

#[test]
fn test_renderer_api_exists() {
    let renderer = ViewRenderer::default();
    assert!(renderer.config().validate().is_ok());
}

#[test]
fn test_empty_input() {
    let renderer = ViewRenderer::default();
    for view_type in [ViewType::General, ViewType::ActionFlow, ViewType::Interconnection] {
        let rendered = block_on(renderer.render(&[], &[], &ViewConfig::new(view_type)))
            .expect("Empty input should render");
        assert!(rendered.nodes.is_empty());
        assert!(rendered.edges.is_empty());
    }
}

#[test]
fn test_backend_selection() {
    let renderer = ViewRenderer::default();
    assert_eq!(
        renderer.select_backend(&ViewConfig::new(ViewType::Interconnection)),
        LayoutBackend::Grid
    );
    for view_type in [ViewType::General, ViewType::ActionFlow, ViewType::StateTransition] {
        assert_eq!(
            renderer.select_backend(&ViewConfig::new(view_type)),
            LayoutBackend::Hierarchical
        );
    }
    assert_eq!(
        renderer.select_backend(&ViewConfig::new(ViewType::from_tag("timeline"))),
        LayoutBackend::Hierarchical
    );

    let configured = ViewRenderer::new(level_flow_config());
    assert_eq!(
        configured.select_backend(&ViewConfig::new(ViewType::ActionFlow)),
        LayoutBackend::Level
    );
    assert_eq!(
        configured.select_backend(&ViewConfig::new(ViewType::StateTransition)),
        LayoutBackend::Hierarchical
    );
}

#[test]
fn test_unknown_view_type_uses_hierarchical_engine() {
    let (symbols, relationships) = action_flow();
    let view: ViewConfig =
        serde_json::from_value(serde_json::json!({"type": "timeline"})).expect("Lenient view");
    let renderer = ViewRenderer::with_engine(AppConfig::default(), StackingEngine::default());

    block_on(renderer.render(&symbols, &relationships, &view)).expect("Failed to render");
    assert_eq!(renderer.engine().calls.get(), 1);
}

#[test]
fn test_level_and_grid_do_not_call_engine() {
    let (symbols, relationships) = action_flow();
    let renderer = ViewRenderer::with_engine(level_flow_config(), StackingEngine::default());

    for view_type in [ViewType::ActionFlow, ViewType::Interconnection] {
        block_on(renderer.render(&symbols, &relationships, &ViewConfig::new(view_type)))
            .expect("Failed to render");
    }
    assert_eq!(renderer.engine().calls.get(), 0);

    block_on(renderer.render(&symbols, &relationships, &ViewConfig::new(ViewType::StateTransition)))
        .expect("Failed to render");
    assert_eq!(renderer.engine().calls.get(), 1);
}

#[test]
fn test_action_flow_chain_levels() {
    let (symbols, relationships) = action_flow();
    let renderer = ViewRenderer::new(level_flow_config());

    let down = block_on(renderer.render(&symbols, &relationships, &ViewConfig::new(ViewType::ActionFlow)))
        .expect("Failed to render");
    let ys: Vec<_> = down.nodes.iter().map(|node| node.position.y()).collect();
    assert!(ys[0] < ys[1] && ys[1] < ys[2], "levels should advance: {ys:?}");

    let right_view = ViewConfig::new(ViewType::ActionFlow).with_direction(LayoutDirection::Right);
    let right = block_on(renderer.render(&symbols, &relationships, &right_view))
        .expect("Failed to render");
    let xs: Vec<_> = right.nodes.iter().map(|node| node.position.x()).collect();
    assert!(xs[0] < xs[1] && xs[1] < xs[2], "levels should advance: {xs:?}");
}

#[test]
fn test_interconnection_grid_of_four() {
    let symbols: Vec<_> = ["A", "B", "C", "D"]
        .iter()
        .map(|name| Symbol::new(*name, *name, "PartUsage"))
        .collect();
    let renderer = ViewRenderer::default();

    let rendered = block_on(renderer.render(&symbols, &[], &ViewConfig::new(ViewType::Interconnection)))
        .expect("Failed to render");

    let a = rendered.node("A").expect("A rendered").position;
    let b = rendered.node("B").expect("B rendered").position;
    let c = rendered.node("C").expect("C rendered").position;
    assert_eq!((a.x(), a.y()), (0.0, 0.0));
    assert_eq!(a.y(), b.y());
    assert_ne!(a.y(), c.y());
    assert_eq!(a.x(), c.x());
}

#[test]
fn test_flat_backends_ignore_nesting() {
    let (symbols, relationships) = vehicle_model();
    let renderer = ViewRenderer::default();

    let rendered = block_on(renderer.render(
        &symbols,
        &relationships,
        &ViewConfig::new(ViewType::Interconnection),
    ))
    .expect("Failed to render");

    assert!(rendered.nodes.iter().all(|node| node.parent_id.is_none()));
    assert!(rendered.nodes.iter().all(|node| !node.data.is_container));
}

#[test]
fn test_filtered_nodes_drop_edges() {
    let symbols = [
        Symbol::new("A", "A", "PartDefinition"),
        Symbol::new("B", "B", "PartDefinition"),
    ];
    let relationships = [Relationship::new("dependency", "A", "B")];
    let view = ViewConfig::new(ViewType::General).with_node_types(["ActionUsage"]);

    let rendered = block_on(ViewRenderer::default().render(&symbols, &relationships, &view))
        .expect("Failed to render");
    assert!(rendered.nodes.is_empty());
    assert!(rendered.edges.is_empty());
}

#[test]
fn test_general_view_keeps_containment() {
    let (symbols, relationships) = vehicle_model();
    let renderer = ViewRenderer::default();

    let rendered = block_on(renderer.render(&symbols, &relationships, &ViewConfig::new(ViewType::General)))
        .expect("Failed to render");

    let vehicle = rendered.node("Demo__Vehicle").expect("Vehicle rendered");
    assert!(vehicle.data.is_container);
    assert_eq!(vehicle.data.content, ["mass : MassValue", "---", "in fuelIn"]);

    for child_id in ["Demo__Vehicle__engine", "Demo__Vehicle__wheels"] {
        let child = rendered.node(child_id).expect("child rendered");
        assert_eq!(child.parent_id.as_deref(), Some("Demo__Vehicle"));
        assert!(child.position.x() >= 0.0);
        assert!(child.position.y() >= 0.0);
        assert!(child.position.x() + child.width <= vehicle.width);
        assert!(child.position.y() + child.height <= vehicle.height);
    }

    assert_eq!(rendered.edges.len(), 3);
    assert_eq!(rendered.edges[1].multiplicity.as_deref(), Some("4"));
}

#[test]
fn test_layout_is_idempotent() {
    let (symbols, relationships) = vehicle_model();
    let renderer = ViewRenderer::with_engine(AppConfig::default(), StackingEngine::default());

    for view_type in [ViewType::General, ViewType::ActionFlow, ViewType::Interconnection] {
        let view = ViewConfig::new(view_type);
        let first = block_on(renderer.render(&symbols, &relationships, &view)).expect("first");
        let second = block_on(renderer.render(&symbols, &relationships, &view)).expect("second");
        assert_eq!(first, second, "{view_type} layout differs between runs");
    }
}

#[test]
fn test_bundled_engine_is_idempotent() {
    let (mut symbols, mut relationships) = vehicle_model();
    let (flow_symbols, flow_relationships) = action_flow();
    symbols.extend(flow_symbols);
    relationships.extend(flow_relationships);
    relationships.push(Relationship::new("dependency", "Trip::Drive", "Demo::Vehicle"));
    relationships.push(Relationship::new("dependency", "Trip::Start", "Demo::Wheel"));

    let renderer = ViewRenderer::default();
    for view_type in [ViewType::General, ViewType::ActionFlow] {
        let view = ViewConfig::new(view_type);
        let first = block_on(renderer.render(&symbols, &relationships, &view)).expect("first");
        let second = block_on(renderer.render(&symbols, &relationships, &view)).expect("second");
        assert_eq!(first, second, "{view_type} layout differs between runs");
    }
}

#[test]
fn test_engine_failure_propagates() {
    let (symbols, relationships) = vehicle_model();
    let renderer = ViewRenderer::with_engine(AppConfig::default(), FailingEngine);

    let result = block_on(renderer.render(&symbols, &relationships, &ViewConfig::new(ViewType::General)));
    match result {
        Err(ModelViewError::Engine(EngineError::Rejected(message))) => {
            assert_eq!(message, "engine offline");
        }
        other => panic!("Expected engine error, got {other:?}"),
    }
}

#[test]
fn test_misrooted_response_is_layout_error() {
    let (symbols, relationships) = vehicle_model();
    let renderer = ViewRenderer::with_engine(AppConfig::default(), MisrootedEngine);

    let result = block_on(renderer.render(&symbols, &relationships, &ViewConfig::new(ViewType::General)));
    assert!(matches!(result, Err(ModelViewError::Layout(_))));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = config_from_toml(
        r#"
        [layout.grid]
        cell_width = 0.0
        "#,
    );
    let renderer = ViewRenderer::new(config);

    let result = block_on(renderer.render(&[], &[], &ViewConfig::new(ViewType::Interconnection)));
    assert!(matches!(result, Err(ModelViewError::Config(_))));
}

#[test]
fn test_strip_labels_and_hidden_fields() {
    let (symbols, relationships) = vehicle_model();
    let config = config_from_toml(
        r#"
        [render]
        theme = "dark"
        strip_edge_labels = true
        hidden_fields = ["fuelIn"]
        "#,
    );
    let plain = ViewRenderer::with_engine(AppConfig::default(), StackingEngine::default());
    let stripped = ViewRenderer::with_engine(config, StackingEngine::default());
    let view = ViewConfig::new(ViewType::General);

    let before = block_on(plain.render(&symbols, &relationships, &view)).expect("plain");
    let after = block_on(stripped.render(&symbols, &relationships, &view)).expect("stripped");

    assert!(before.edges.iter().any(|edge| edge.label.is_some()));
    assert!(after.edges.iter().all(|edge| edge.label.is_none()));
    assert_eq!(after.theme, modelview::config::Theme::Dark);

    let vehicle = after.node("Demo__Vehicle").expect("Vehicle rendered");
    assert_eq!(vehicle.data.content, ["mass : MassValue"]);

    let positions = |view: &modelview::render::RenderedView| -> Vec<_> {
        view.nodes.iter().map(|node| node.position).collect()
    };
    assert_eq!(positions(&before), positions(&after));
}

#[test]
fn test_custom_backend_table() {
    let (symbols, relationships) = action_flow();
    let config = config_from_toml(
        r#"
        [layout.backends]
        action_flow = "grid"
        "#,
    );
    let renderer = ViewRenderer::new(config);

    let rendered = block_on(renderer.render(&symbols, &relationships, &ViewConfig::new(ViewType::ActionFlow)))
        .expect("Failed to render");
    // 3 nodes on a 2-column grid
    assert_eq!(rendered.nodes[0].position.y(), rendered.nodes[1].position.y());
    assert!(rendered.nodes[2].position.y() > rendered.nodes[0].position.y());
}

#[test]
fn test_build_graph_exposes_structure() {
    let (symbols, relationships) = vehicle_model();
    let renderer = ViewRenderer::default();

    let graph = renderer.build_graph(&symbols, &relationships, &ViewConfig::new(ViewType::General));
    assert_eq!(graph.len(), 5);
    assert_eq!(graph.children("Demo__Vehicle").count(), 2);
    assert!(graph.container_top_padding("Demo__Vehicle").is_some());

    let nested = renderer.build_graph(&symbols, &relationships, &ViewConfig::new(ViewType::ActionFlow));
    assert_eq!(nested.top_level_nodes().count(), 3);

    let flat =
        renderer.build_graph(&symbols, &relationships, &ViewConfig::new(ViewType::Interconnection));
    assert_eq!(flat.top_level_nodes().count(), 5);
}

#[test]
fn test_bundled_engine_lays_out_nested_model() {
    let (symbols, relationships) = vehicle_model();
    let graph = block_on(ViewRenderer::default().layout(
        &symbols,
        &relationships,
        &ViewConfig::new(ViewType::General),
    ))
    .expect("Failed to lay out");

    let top: Vec<_> = graph.top_level_nodes().collect();
    for (i, a) in top.iter().enumerate() {
        for b in &top[i + 1..] {
            let (pa, sa, pb, sb) = (a.position(), a.size(), b.position(), b.size());
            let separated = pa.x() + sa.width() <= pb.x() + 0.01
                || pb.x() + sb.width() <= pa.x() + 0.01
                || pa.y() + sa.height() <= pb.y() + 0.01
                || pb.y() + sb.height() <= pa.y() + 0.01;
            assert!(separated, "{} overlaps {}", a.id(), b.id());
        }
    }

    let vehicle = graph.node("Demo__Vehicle").expect("Vehicle laid out");
    let top_padding = graph
        .container_top_padding("Demo__Vehicle")
        .expect("Vehicle is a container");
    for child in graph.children("Demo__Vehicle") {
        assert!(child.position().y() >= top_padding);
        assert!(child.position().x() + child.size().width() <= vehicle.size().width());
    }
}

#[test]
fn test_engine_node_shape_for_external_engines() {
    let node = EngineNode {
        id: "n".to_string(),
        width: 10.0,
        height: 20.0,
        x: 0.0,
        y: 0.0,
        layout_options: None,
        children: Vec::new(),
    };
    let value = serde_json::to_value(&node).expect("serializable");
    assert_eq!(value["width"], 10.0);
    assert!(value.get("layoutOptions").is_none());
}
