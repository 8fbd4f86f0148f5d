//! View configuration: which view is rendered and which elements it shows.

use std::{fmt, str::FromStr};

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of view being rendered.
///
/// Parsing is lenient: [`ViewType::from_tag`] maps any unrecognized tag to
/// [`ViewType::General`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    #[default]
    General,
    Interconnection,
    ActionFlow,
    StateTransition,
    Sequence,
    Browser,
    Grid,
    Geometry,
}

impl ViewType {
    /// Resolves a view type tag, defaulting to [`ViewType::General`].
    ///
    /// Tags are matched case-insensitively and `-`, `_` and spaces are ignored,
    /// so `action-flow`, `ActionFlow` and `action_flow` are equivalent. The
    /// `View` suffix used by some models (`InterconnectionView`) is accepted.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            debug!(tag; "Unknown view type, using general view");
            Self::General
        })
    }
}

impl FromStr for ViewType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let normalized = normalized.strip_suffix("view").unwrap_or(&normalized);
        match normalized {
            "general" | "default" => Ok(Self::General),
            "interconnection" => Ok(Self::Interconnection),
            "actionflow" | "flow" => Ok(Self::ActionFlow),
            "statetransition" | "state" => Ok(Self::StateTransition),
            "sequence" => Ok(Self::Sequence),
            "browser" => Ok(Self::Browser),
            "grid" => Ok(Self::Grid),
            "geometry" => Ok(Self::Geometry),
            _ => Err("Unsupported view type"),
        }
    }
}

impl From<ViewType> for &'static str {
    fn from(val: ViewType) -> Self {
        match val {
            ViewType::General => "general",
            ViewType::Interconnection => "interconnection",
            ViewType::ActionFlow => "action_flow",
            ViewType::StateTransition => "state_transition",
            ViewType::Sequence => "sequence",
            ViewType::Browser => "browser",
            ViewType::Grid => "grid",
            ViewType::Geometry => "geometry",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

impl<'de> Deserialize<'de> for ViewType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Main flow direction of a layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    /// Levels advance top to bottom.
    #[default]
    Down,
    /// Levels advance left to right.
    Right,
}

impl LayoutDirection {
    /// Resolves a direction tag, defaulting to [`LayoutDirection::Down`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_uppercase().as_str() {
            "LR" | "RIGHT" | "HORIZONTAL" | "RL" | "LEFT" => Self::Right,
            "TB" | "TD" | "DOWN" | "VERTICAL" | "BT" | "UP" => Self::Down,
            _ => {
                debug!(tag; "Unknown layout direction, using top-down");
                Self::Down
            }
        }
    }
}

impl<'de> Deserialize<'de> for LayoutDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// Selects what a view shows and how it is arranged.
///
/// Type filters are allow-lists: a type is shown iff its list is empty or
/// contains it.
///
/// # Examples
///
/// ```
/// use modelview_core::semantic::{ViewConfig, ViewType};
///
/// let view = ViewConfig::new(ViewType::General).with_node_types(["PartDefinition"]);
/// assert!(view.includes_node_type("PartDefinition"));
/// assert!(!view.includes_node_type("PortUsage"));
/// assert!(view.includes_edge_type("anything"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    #[serde(rename = "type", default)]
    view_type: ViewType,
    #[serde(default)]
    direction: Option<LayoutDirection>,
    #[serde(default)]
    include_node_types: Vec<String>,
    #[serde(default)]
    include_edge_types: Vec<String>,
    #[serde(default)]
    show_nesting: Option<bool>,
}

impl ViewConfig {
    /// Create a view showing every node and edge type, with nesting.
    pub fn new(view_type: ViewType) -> Self {
        Self {
            view_type,
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_node_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_node_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_edge_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_edge_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_nesting(mut self, show_nesting: bool) -> Self {
        self.show_nesting = Some(show_nesting);
        self
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Returns the configured direction, [`LayoutDirection::Down`] if unset.
    pub fn direction(&self) -> LayoutDirection {
        self.direction.unwrap_or_default()
    }

    /// Whether nested symbols are drawn inside their parents. Defaults to `true`.
    pub fn show_nesting(&self) -> bool {
        self.show_nesting.unwrap_or(true)
    }

    pub fn includes_node_type(&self, node_type: &str) -> bool {
        allows(&self.include_node_types, node_type)
    }

    pub fn includes_edge_type(&self, edge_type: &str) -> bool {
        allows(&self.include_edge_types, edge_type)
    }
}

fn allows(allow_list: &[String], value: &str) -> bool {
    allow_list.is_empty() || allow_list.iter().any(|allowed| allowed == value)
}
