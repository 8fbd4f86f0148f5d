//! Model elements consumed by the layout pipeline.

use std::{fmt, str::FromStr};

use log::debug;
use serde::{Deserialize, Deserializer, Serialize};

/// Direction of a port or directed feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    In,
    Out,
    InOut,
}

impl PortDirection {
    /// Resolves a direction tag case-insensitively.
    ///
    /// Unknown tags yield `None`, the same as a symbol without direction.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.parse() {
            Ok(direction) => Some(direction),
            Err(_) => {
                debug!(tag; "Unknown port direction, ignored");
                None
            }
        }
    }

    /// Returns the keyword shown in front of a content line.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inout",
        }
    }
}

impl FromStr for PortDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "inout" | "in_out" | "in-out" => Ok(Self::InOut),
            _ => Err("Unsupported port direction"),
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

fn deserialize_direction<'de, D>(deserializer: D) -> Result<Option<PortDirection>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(PortDirection::from_tag))
}

/// A model element to be rendered either as a node or as a content line of
/// its parent node.
///
/// `qualified_name` must be unique across one layout input. `parent` refers to
/// the qualified name of the containing symbol; a parent that does not resolve
/// is tolerated and simply produces no nesting.
///
/// # Examples
///
/// ```
/// use modelview_core::semantic::{PortDirection, Symbol};
///
/// let part = Symbol::new("Vehicle", "Pkg::Vehicle", "PartDefinition");
/// let port = Symbol::new("fuelIn", "Pkg::Vehicle::fuelIn", "PortUsage")
///     .with_parent("Pkg::Vehicle")
///     .with_direction(PortDirection::In);
///
/// assert_eq!(port.parent(), Some("Pkg::Vehicle"));
/// assert!(part.features().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    name: String,
    qualified_name: String,
    node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typed_by: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_direction",
        skip_serializing_if = "Option::is_none"
    )]
    direction: Option<PortDirection>,
}

impl Symbol {
    /// Create a symbol without parent, features, type or direction.
    pub fn new(
        name: impl Into<String>,
        qualified_name: impl Into<String>,
        node_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            node_type: node_type.into(),
            parent: None,
            features: Vec::new(),
            typed_by: None,
            direction: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_typed_by(mut self, typed_by: impl Into<String>) -> Self {
        self.typed_by = Some(typed_by.into());
        self
    }

    pub fn with_direction(mut self, direction: PortDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Set the pre-formatted content lines of the symbol.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Raw type tag as delivered by the upstream model.
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn typed_by(&self) -> Option<&str> {
        self.typed_by.as_deref()
    }

    pub fn direction(&self) -> Option<PortDirection> {
        self.direction
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name)
    }
}

/// A typed connection between two symbols, identified by qualified names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(rename = "type")]
    relation_type: String,
    source: String,
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multiplicity: Option<String>,
}

impl Relationship {
    /// Create a relationship of the given type from `source` to `target`.
    pub fn new(
        relation_type: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            relation_type: relation_type.into(),
            source: source.into(),
            target: target.into(),
            label: None,
            multiplicity: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: impl Into<String>) -> Self {
        self.multiplicity = Some(multiplicity.into());
        self
    }

    pub fn relation_type(&self) -> &str {
        &self.relation_type
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn multiplicity(&self) -> Option<&str> {
        self.multiplicity.as_deref()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}]-> {}",
            self.source, self.relation_type, self.target
        )
    }
}
