//! Node kinds and their display configuration.
//!
//! Every model element kind is one variant of [`NodeKind`]. Each variant maps
//! to an immutable [`NodeKindConfig`] record carrying the upstream type tag,
//! the keyword shown in the node header and the [`NodeCategory`] the renderer
//! groups kinds by. Unrecognized tags resolve to [`NodeKind::Default`].

use std::fmt;

use log::debug;
use serde::Serialize;

/// Broad grouping of node kinds used by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Package,
    Definition,
    Usage,
    Behavior,
    Requirement,
    Annotation,
    Other,
}

/// Immutable display configuration of a [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKindConfig {
    tag: &'static str,
    keyword: &'static str,
    category: NodeCategory,
}

impl NodeKindConfig {
    const fn new(tag: &'static str, keyword: &'static str, category: NodeCategory) -> Self {
        Self {
            tag,
            keyword,
            category,
        }
    }

    /// Type tag as used by the upstream model.
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Keyword shown in the node header, e.g. `part def`.
    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    pub fn category(&self) -> NodeCategory {
        self.category
    }
}

/// Kind of a model element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Package,
    LibraryPackage,
    PartDefinition,
    PartUsage,
    AttributeDefinition,
    AttributeUsage,
    PortDefinition,
    PortUsage,
    ItemDefinition,
    ItemUsage,
    ConnectionDefinition,
    ConnectionUsage,
    InterfaceDefinition,
    InterfaceUsage,
    AllocationDefinition,
    AllocationUsage,
    ActionDefinition,
    ActionUsage,
    StateDefinition,
    StateUsage,
    TransitionUsage,
    CalculationDefinition,
    CalculationUsage,
    ConstraintDefinition,
    ConstraintUsage,
    RequirementDefinition,
    RequirementUsage,
    ConcernDefinition,
    UseCaseDefinition,
    UseCaseUsage,
    EnumerationDefinition,
    EnumerationUsage,
    OccurrenceDefinition,
    OccurrenceUsage,
    ViewDefinition,
    ViewUsage,
    ViewpointDefinition,
    ReferenceUsage,
    Feature,
    Classifier,
    Comment,
    Documentation,
    /// Reserved fallback for tags the model does not know.
    Default,
}

impl NodeKind {
    /// All kinds in declaration order.
    pub const ALL: &'static [NodeKind] = &[
        Self::Package,
        Self::LibraryPackage,
        Self::PartDefinition,
        Self::PartUsage,
        Self::AttributeDefinition,
        Self::AttributeUsage,
        Self::PortDefinition,
        Self::PortUsage,
        Self::ItemDefinition,
        Self::ItemUsage,
        Self::ConnectionDefinition,
        Self::ConnectionUsage,
        Self::InterfaceDefinition,
        Self::InterfaceUsage,
        Self::AllocationDefinition,
        Self::AllocationUsage,
        Self::ActionDefinition,
        Self::ActionUsage,
        Self::StateDefinition,
        Self::StateUsage,
        Self::TransitionUsage,
        Self::CalculationDefinition,
        Self::CalculationUsage,
        Self::ConstraintDefinition,
        Self::ConstraintUsage,
        Self::RequirementDefinition,
        Self::RequirementUsage,
        Self::ConcernDefinition,
        Self::UseCaseDefinition,
        Self::UseCaseUsage,
        Self::EnumerationDefinition,
        Self::EnumerationUsage,
        Self::OccurrenceDefinition,
        Self::OccurrenceUsage,
        Self::ViewDefinition,
        Self::ViewUsage,
        Self::ViewpointDefinition,
        Self::ReferenceUsage,
        Self::Feature,
        Self::Classifier,
        Self::Comment,
        Self::Documentation,
        Self::Default,
    ];

    /// Returns the configuration record of this kind.
    pub fn config(self) -> NodeKindConfig {
        use NodeCategory::*;

        match self {
            Self::Package => NodeKindConfig::new("Package", "package", Package),
            Self::LibraryPackage => {
                NodeKindConfig::new("LibraryPackage", "library package", Package)
            }
            Self::PartDefinition => NodeKindConfig::new("PartDefinition", "part def", Definition),
            Self::PartUsage => NodeKindConfig::new("PartUsage", "part", Usage),
            Self::AttributeDefinition => {
                NodeKindConfig::new("AttributeDefinition", "attribute def", Definition)
            }
            Self::AttributeUsage => NodeKindConfig::new("AttributeUsage", "attribute", Usage),
            Self::PortDefinition => NodeKindConfig::new("PortDefinition", "port def", Definition),
            Self::PortUsage => NodeKindConfig::new("PortUsage", "port", Usage),
            Self::ItemDefinition => NodeKindConfig::new("ItemDefinition", "item def", Definition),
            Self::ItemUsage => NodeKindConfig::new("ItemUsage", "item", Usage),
            Self::ConnectionDefinition => {
                NodeKindConfig::new("ConnectionDefinition", "connection def", Definition)
            }
            Self::ConnectionUsage => NodeKindConfig::new("ConnectionUsage", "connection", Usage),
            Self::InterfaceDefinition => {
                NodeKindConfig::new("InterfaceDefinition", "interface def", Definition)
            }
            Self::InterfaceUsage => NodeKindConfig::new("InterfaceUsage", "interface", Usage),
            Self::AllocationDefinition => {
                NodeKindConfig::new("AllocationDefinition", "allocation def", Definition)
            }
            Self::AllocationUsage => NodeKindConfig::new("AllocationUsage", "allocation", Usage),
            Self::ActionDefinition => {
                NodeKindConfig::new("ActionDefinition", "action def", Behavior)
            }
            Self::ActionUsage => NodeKindConfig::new("ActionUsage", "action", Behavior),
            Self::StateDefinition => NodeKindConfig::new("StateDefinition", "state def", Behavior),
            Self::StateUsage => NodeKindConfig::new("StateUsage", "state", Behavior),
            Self::TransitionUsage => NodeKindConfig::new("TransitionUsage", "transition", Behavior),
            Self::CalculationDefinition => {
                NodeKindConfig::new("CalculationDefinition", "calc def", Behavior)
            }
            Self::CalculationUsage => NodeKindConfig::new("CalculationUsage", "calc", Behavior),
            Self::ConstraintDefinition => {
                NodeKindConfig::new("ConstraintDefinition", "constraint def", Requirement)
            }
            Self::ConstraintUsage => {
                NodeKindConfig::new("ConstraintUsage", "constraint", Requirement)
            }
            Self::RequirementDefinition => {
                NodeKindConfig::new("RequirementDefinition", "requirement def", Requirement)
            }
            Self::RequirementUsage => {
                NodeKindConfig::new("RequirementUsage", "requirement", Requirement)
            }
            Self::ConcernDefinition => {
                NodeKindConfig::new("ConcernDefinition", "concern def", Requirement)
            }
            Self::UseCaseDefinition => {
                NodeKindConfig::new("UseCaseDefinition", "use case def", Behavior)
            }
            Self::UseCaseUsage => NodeKindConfig::new("UseCaseUsage", "use case", Behavior),
            Self::EnumerationDefinition => {
                NodeKindConfig::new("EnumerationDefinition", "enum def", Definition)
            }
            Self::EnumerationUsage => NodeKindConfig::new("EnumerationUsage", "enum", Usage),
            Self::OccurrenceDefinition => {
                NodeKindConfig::new("OccurrenceDefinition", "occurrence def", Definition)
            }
            Self::OccurrenceUsage => NodeKindConfig::new("OccurrenceUsage", "occurrence", Usage),
            Self::ViewDefinition => NodeKindConfig::new("ViewDefinition", "view def", Definition),
            Self::ViewUsage => NodeKindConfig::new("ViewUsage", "view", Usage),
            Self::ViewpointDefinition => {
                NodeKindConfig::new("ViewpointDefinition", "viewpoint def", Definition)
            }
            Self::ReferenceUsage => NodeKindConfig::new("ReferenceUsage", "ref", Usage),
            Self::Feature => NodeKindConfig::new("Feature", "feature", Usage),
            Self::Classifier => NodeKindConfig::new("Classifier", "classifier", Definition),
            Self::Comment => NodeKindConfig::new("Comment", "comment", Annotation),
            Self::Documentation => NodeKindConfig::new("Documentation", "doc", Annotation),
            Self::Default => NodeKindConfig::new("default", "element", Other),
        }
    }

    /// Resolves an upstream type tag.
    ///
    /// Unknown tags are never an error: they resolve to [`NodeKind::Default`]
    /// so partially understood models still render.
    pub fn from_tag(tag: &str) -> Self {
        match Self::ALL.iter().find(|kind| kind.config().tag() == tag) {
            Some(kind) => *kind,
            None => {
                debug!(tag; "Unknown node type, using fallback kind");
                Self::Default
            }
        }
    }

    /// Type tag as used by the upstream model.
    pub fn tag(self) -> &'static str {
        self.config().tag()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
