//! Configuration types for view layout and rendering.
//!
//! This module provides configuration structures that control how views are
//! laid out and post-processed. All types implement [`serde::Deserialize`] for
//! loading from external sources; every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and render settings.
//! - [`LayoutConfig`] - Backend selection per view type and per-backend spacing.
//! - [`RenderConfig`] - Theme and post-layout stripping options.
//!
//! # Example
//!
//! ```
//! # use modelview::config::{AppConfig, LayoutBackend};
//! # use modelview_core::semantic::ViewType;
//! let config = AppConfig::default();
//! assert_eq!(
//!     config.layout().backend_for(ViewType::Interconnection),
//!     LayoutBackend::Grid
//! );
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use modelview_core::semantic::ViewType;

use crate::ModelViewError;

/// Top-level configuration combining layout and render settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and render configurations.
    pub fn new(layout: LayoutConfig, render: RenderConfig) -> Self {
        Self { layout, render }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Checks that every spacing value is a positive, finite number.
    ///
    /// # Errors
    ///
    /// Returns [`ModelViewError::Config`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ModelViewError> {
        let layout = &self.layout;
        let values = [
            ("level.level_spacing", layout.level.level_spacing),
            ("level.node_spacing", layout.level.node_spacing),
            ("grid.cell_width", layout.grid.cell_width),
            ("grid.cell_height", layout.grid.cell_height),
            ("hierarchical.node_spacing", layout.hierarchical.node_spacing),
            ("hierarchical.layer_spacing", layout.hierarchical.layer_spacing),
            (
                "hierarchical.container_padding",
                layout.hierarchical.container_padding,
            ),
        ];
        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelViewError::Config(format!(
                    "layout.{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// The layout algorithm used to position a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutBackend {
    /// Delegate to a [`HierarchicalEngine`](crate::layout::HierarchicalEngine),
    /// keeping containment.
    Hierarchical,
    /// Breadth-first levels from the root nodes.
    Level,
    /// Square-ish grid in input order.
    Grid,
}

impl LayoutBackend {
    /// Default backend for a view type.
    ///
    /// Interconnection views are symmetric overviews and use the grid.
    /// Every other view, including views whose type was not recognized, is
    /// hierarchical. The level backend is only used when configured.
    pub fn default_for(view_type: ViewType) -> Self {
        match view_type {
            ViewType::Interconnection => Self::Grid,
            ViewType::General
            | ViewType::ActionFlow
            | ViewType::StateTransition
            | ViewType::Sequence
            | ViewType::Browser
            | ViewType::Grid
            | ViewType::Geometry => Self::Hierarchical,
        }
    }

    /// Whether the backend lays out nested nodes inside their containers.
    pub fn supports_nesting(self) -> bool {
        matches!(self, Self::Hierarchical)
    }
}

/// Layout settings: backend selection and per-backend spacing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Overrides of the default backend per view type.
    #[serde(default)]
    backends: BTreeMap<ViewType, LayoutBackend>,

    #[serde(default)]
    level: LevelLayoutConfig,

    #[serde(default)]
    grid: GridLayoutConfig,

    #[serde(default)]
    hierarchical: HierarchicalLayoutConfig,
}

impl LayoutConfig {
    pub fn new(
        level: LevelLayoutConfig,
        grid: GridLayoutConfig,
        hierarchical: HierarchicalLayoutConfig,
    ) -> Self {
        Self {
            backends: BTreeMap::new(),
            level,
            grid,
            hierarchical,
        }
    }

    /// Routes a view type to a specific backend.
    pub fn with_backend(mut self, view_type: ViewType, backend: LayoutBackend) -> Self {
        self.backends.insert(view_type, backend);
        self
    }

    /// Returns the backend for a view type, honoring overrides.
    pub fn backend_for(&self, view_type: ViewType) -> LayoutBackend {
        self.backends
            .get(&view_type)
            .copied()
            .unwrap_or_else(|| LayoutBackend::default_for(view_type))
    }

    pub fn level(&self) -> &LevelLayoutConfig {
        &self.level
    }

    pub fn grid(&self) -> &GridLayoutConfig {
        &self.grid
    }

    pub fn hierarchical(&self) -> &HierarchicalLayoutConfig {
        &self.hierarchical
    }
}

/// Spacing of the level layout.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LevelLayoutConfig {
    /// Distance between consecutive levels.
    level_spacing: f32,
    /// Distance between nodes of the same level.
    node_spacing: f32,
}

impl LevelLayoutConfig {
    pub fn new(level_spacing: f32, node_spacing: f32) -> Self {
        Self {
            level_spacing,
            node_spacing,
        }
    }

    pub fn level_spacing(&self) -> f32 {
        self.level_spacing
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }
}

impl Default for LevelLayoutConfig {
    fn default() -> Self {
        Self::new(150.0, 250.0)
    }
}

/// Cell dimensions of the grid layout.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GridLayoutConfig {
    cell_width: f32,
    cell_height: f32,
}

impl GridLayoutConfig {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self::new(300.0, 200.0)
    }
}

/// Options forwarded to the hierarchical layout engine.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HierarchicalLayoutConfig {
    /// Spacing between sibling nodes.
    node_spacing: f32,
    /// Spacing between layers.
    layer_spacing: f32,
    /// Padding on the left, right and bottom edges of containers. The top edge
    /// is derived from the container's own content.
    container_padding: f32,
}

impl HierarchicalLayoutConfig {
    pub fn new(node_spacing: f32, layer_spacing: f32, container_padding: f32) -> Self {
        Self {
            node_spacing,
            layer_spacing,
            container_padding,
        }
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn layer_spacing(&self) -> f32 {
        self.layer_spacing
    }

    pub fn container_padding(&self) -> f32 {
        self.container_padding
    }
}

impl Default for HierarchicalLayoutConfig {
    fn default() -> Self {
        Self::new(50.0, 80.0, 20.0)
    }
}

/// Color theme handed to the rendering collaborator.
///
/// The theme is resolved once by the caller and injected here; it does not
/// influence layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Post-layout processing applied before hand-off to the renderer.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    theme: Theme,
    /// Remove every edge label.
    strip_edge_labels: bool,
    /// Field names whose content lines are hidden, e.g. behavioral details.
    hidden_fields: Vec<String>,
}

impl RenderConfig {
    pub fn new(theme: Theme, strip_edge_labels: bool, hidden_fields: Vec<String>) -> Self {
        Self {
            theme,
            strip_edge_labels,
            hidden_fields,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn strip_edge_labels(&self) -> bool {
        self.strip_edge_labels
    }

    pub fn hidden_fields(&self) -> &[String] {
        &self.hidden_fields
    }
}
