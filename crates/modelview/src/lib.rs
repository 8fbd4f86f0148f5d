//! Modelview - Layout pipeline for model diagrams.
//!
//! Turns a flat collection of typed model symbols and relationships into a
//! sized, positioned and optionally nested graph ready for drawing:
//!
//! 1. symbols are classified as nodes or inline content of their parent;
//! 2. inline content is aggregated and node sizes are computed from it;
//! 3. one layout backend positions the graph, chosen by the view type;
//! 4. the result is post-processed and handed out as a [`render::RenderedView`].
//!
//! Drawing, styling and interaction are left to the caller.

pub mod config;

mod error;
pub mod layout;
pub mod render;
pub mod structure;

pub use modelview_core::{geometry, identifier, semantic};

pub use error::ModelViewError;

use log::{debug, info, trace};

use config::{AppConfig, LayoutBackend};
use layout::{
    GridLayout, HierarchicalEngine, LevelLayout, PositionEngine, SugiyamaEngine,
    hierarchical::Adapter,
};
use render::RenderedView;
use semantic::{Relationship, Symbol, ViewConfig};
use structure::DiagramGraph;

/// Renders model views through the layout pipeline.
///
/// Every call is a fresh computation: no state is kept between calls. The
/// hierarchical backend delegates to the engine `E`, which defaults to the
/// bundled [`SugiyamaEngine`].
///
/// # Examples
///
/// ```
/// use futures::executor::block_on;
/// use modelview::{
///     ViewRenderer,
///     semantic::{Relationship, Symbol, ViewConfig, ViewType},
/// };
///
/// let symbols = [
///     Symbol::new("Start", "Flow::Start", "ActionUsage"),
///     Symbol::new("Stop", "Flow::Stop", "ActionUsage"),
/// ];
/// let relationships = [Relationship::new("succession", "Flow::Start", "Flow::Stop")];
/// let view = ViewConfig::new(ViewType::ActionFlow);
///
/// let renderer = ViewRenderer::default();
/// let rendered = block_on(renderer.render(&symbols, &relationships, &view))
///     .expect("Failed to render view");
///
/// assert_eq!(rendered.nodes.len(), 2);
/// assert!(rendered.nodes[0].position.y() < rendered.nodes[1].position.y());
/// ```
pub struct ViewRenderer<E = SugiyamaEngine> {
    config: AppConfig,
    engine: E,
}

impl ViewRenderer {
    /// Create a renderer using the bundled hierarchical engine.
    pub fn new(config: AppConfig) -> Self {
        Self::with_engine(config, SugiyamaEngine::new())
    }
}

impl Default for ViewRenderer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl<E> ViewRenderer<E>
where
    E: HierarchicalEngine,
{
    /// Create a renderer delegating hierarchical layout to `engine`.
    pub fn with_engine(config: AppConfig, engine: E) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Backend used for a view, from the configured backend table.
    pub fn select_backend(&self, view: &ViewConfig) -> LayoutBackend {
        self.config.layout().backend_for(view.view_type())
    }

    /// Build the sized, unpositioned graph of a view.
    ///
    /// Backends that do not lay out containment get a flat graph.
    pub fn build_graph(
        &self,
        symbols: &[Symbol],
        relationships: &[Relationship],
        view: &ViewConfig,
    ) -> DiagramGraph {
        let backend = self.select_backend(view);
        if backend.supports_nesting() {
            DiagramGraph::build(symbols, relationships, view)
        } else {
            let flat_view = view.clone().with_nesting(false);
            DiagramGraph::build(symbols, relationships, &flat_view)
        }
    }

    /// Build and position the graph of a view.
    ///
    /// # Errors
    ///
    /// Returns [`ModelViewError::Config`] for invalid configuration,
    /// [`ModelViewError::Engine`] if the hierarchical engine fails and
    /// [`ModelViewError::Layout`] if its response cannot be applied.
    pub async fn layout(
        &self,
        symbols: &[Symbol],
        relationships: &[Relationship],
        view: &ViewConfig,
    ) -> Result<DiagramGraph, ModelViewError> {
        self.config.validate()?;

        let backend = self.select_backend(view);
        info!(
            view_type:% = view.view_type(),
            backend:?,
            symbols_count = symbols.len(),
            relationships_count = relationships.len();
            "Laying out view",
        );

        let mut graph = self.build_graph(symbols, relationships, view);
        let direction = view.direction();
        match backend {
            LayoutBackend::Hierarchical => {
                Adapter::new(*self.config.layout().hierarchical())
                    .layout(&self.engine, &mut graph, direction)
                    .await?;
            }
            LayoutBackend::Level => {
                LevelLayout::new(*self.config.layout().level()).apply(&mut graph, direction);
            }
            LayoutBackend::Grid => {
                GridLayout::new(*self.config.layout().grid()).apply(&mut graph, direction);
            }
        }

        debug!(nodes_count = graph.len(), edges_count = graph.edges().len(); "Layout calculated");
        Ok(graph)
    }

    /// Lay out a view and convert it for drawing.
    ///
    /// Edge labels and content fields are stripped as configured; positions
    /// are not affected by either.
    ///
    /// # Errors
    ///
    /// Same as [`ViewRenderer::layout`].
    pub async fn render(
        &self,
        symbols: &[Symbol],
        relationships: &[Relationship],
        view: &ViewConfig,
    ) -> Result<RenderedView, ModelViewError> {
        let graph = self.layout(symbols, relationships, view).await?;

        let render_config = self.config.render();
        let mut rendered = RenderedView::from_graph(&graph, render_config.theme());
        if render_config.strip_edge_labels() {
            rendered.strip_edge_labels();
        }
        rendered.hide_fields(render_config.hidden_fields());

        info!(nodes_count = rendered.nodes.len(); "View rendered");
        trace!(rendered:?; "Rendered view");
        Ok(rendered)
    }
}
