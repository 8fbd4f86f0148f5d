//! Content classification of symbols.
//!
//! Decides whether a symbol is drawn as its own node or folded into its
//! parent node as a line of content.

/// How a symbol is represented in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentRole {
    /// Rendered as its own node.
    Structural,
    /// Rendered as a property line of its parent.
    Property,
    /// Rendered as a port line of its parent.
    Port,
}

/// Tags rendered as property lines.
const PROPERTY_TAGS: &[&str] = &[
    "AttributeUsage",
    "ReferenceUsage",
    "Feature",
    "Attribute",
    "Reference",
];

/// Classifies a symbol by its raw type tag.
///
/// Any tag containing `Port` is a port, the attribute/reference/feature tags
/// are properties, and everything else, including unknown tags, is
/// structural.
///
/// # Examples
///
/// ```
/// use modelview::structure::{ContentRole, classify};
///
/// assert_eq!(classify("PortUsage"), ContentRole::Port);
/// assert_eq!(classify("AttributeUsage"), ContentRole::Property);
/// assert_eq!(classify("PartDefinition"), ContentRole::Structural);
/// ```
pub fn classify(node_type: &str) -> ContentRole {
    if node_type.contains("Port") {
        ContentRole::Port
    } else if PROPERTY_TAGS.contains(&node_type) {
        ContentRole::Property
    } else {
        ContentRole::Structural
    }
}

impl ContentRole {
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Structural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_tags() {
        assert_eq!(classify("PortUsage"), ContentRole::Port);
        assert_eq!(classify("PortDefinition"), ContentRole::Port);
        assert_eq!(classify("ConjugatedPortUsage"), ContentRole::Port);
    }

    #[test]
    fn test_property_tags() {
        for tag in PROPERTY_TAGS {
            assert_eq!(classify(tag), ContentRole::Property, "tag {tag}");
        }
    }

    #[test]
    fn test_definitions_are_structural() {
        assert_eq!(classify("AttributeDefinition"), ContentRole::Structural);
        assert_eq!(classify("PartDefinition"), ContentRole::Structural);
        assert_eq!(classify("ActionUsage"), ContentRole::Structural);
    }

    #[test]
    fn test_unknown_tags_are_structural() {
        assert_eq!(classify("Mystery"), ContentRole::Structural);
        assert_eq!(classify(""), ContentRole::Structural);
        assert!(classify("Mystery").is_structural());
    }

    #[test]
    fn test_port_check_is_case_sensitive() {
        // "Support" contains "port" but not "Port".
        assert_eq!(classify("SupportUsage"), ContentRole::Structural);
    }
}
