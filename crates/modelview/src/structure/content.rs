//! Content aggregation for structural nodes.
//!
//! Property and port symbols are not drawn as nodes; they become formatted
//! lines inside their parent. The merged content of a node is always ordered
//! as: property lines, then (if any ports exist) [`PORT_SEPARATOR`] followed by
//! port lines, then the symbol's own pre-formatted features.

use indexmap::IndexMap;
use log::trace;

use modelview_core::{
    identifier::last_segment,
    semantic::{PortDirection, Symbol},
};

use super::ContentRole;

/// Line separating property lines from port lines.
pub const PORT_SEPARATOR: &str = "---";

/// Separator between a feature name and its type in a content line.
pub const TYPE_SEPARATOR: &str = " : ";

/// Formats one content line as `[direction ]name[ : Type]`.
///
/// Only the last namespace segment of the type is shown.
///
/// # Examples
///
/// ```
/// use modelview::structure::format_line;
/// use modelview_core::semantic::{PortDirection, Symbol};
///
/// let mass = Symbol::new("mass", "V::mass", "AttributeUsage").with_typed_by("ISQ::MassValue");
/// assert_eq!(format_line(&mass), "mass : MassValue");
///
/// let port = Symbol::new("p", "V::p", "PortUsage").with_direction(PortDirection::In);
/// assert_eq!(format_line(&port), "in p");
/// ```
pub fn format_line(symbol: &Symbol) -> String {
    let mut line = String::new();
    if let Some(direction) = symbol.direction() {
        line.push_str(direction.keyword());
        line.push(' ');
    }
    line.push_str(symbol.name());
    if let Some(typed_by) = symbol.typed_by() {
        line.push_str(TYPE_SEPARATOR);
        line.push_str(last_segment(typed_by));
    }
    line
}

/// Returns the field name of a content line: the name after an optional
/// direction keyword and before the type separator.
///
/// # Examples
///
/// ```
/// use modelview::structure::field_name;
///
/// assert_eq!(field_name("inout p : Signal"), "p");
/// assert_eq!(field_name("effect"), "effect");
/// ```
pub fn field_name(line: &str) -> &str {
    let line = line.trim();
    let without_direction = [PortDirection::InOut, PortDirection::In, PortDirection::Out]
        .iter()
        .find_map(|direction| {
            line.strip_prefix(direction.keyword())
                .and_then(|rest| rest.strip_prefix(' '))
        })
        .unwrap_or(line);
    without_direction
        .split_once(TYPE_SEPARATOR)
        .map_or(without_direction, |(name, _)| name)
        .trim()
}

/// Collects property and port lines per parent qualified name.
///
/// Lines are kept in input order. Symbols without a parent contribute
/// nothing; lines for parents that never become nodes are simply never
/// asked for.
#[derive(Debug, Default)]
pub struct ContentAggregator {
    properties: IndexMap<String, Vec<String>>,
    ports: IndexMap<String, Vec<String>>,
}

impl ContentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes a non-structural symbol into the line group of its parent.
    ///
    /// Returns `false` if the symbol was not added because it is structural or
    /// has no parent.
    pub fn add(&mut self, symbol: &Symbol, role: ContentRole) -> bool {
        let Some(parent) = symbol.parent() else {
            trace!(symbol = symbol.qualified_name(); "Inline symbol without parent dropped");
            return false;
        };
        let group = match role {
            ContentRole::Property => &mut self.properties,
            ContentRole::Port => &mut self.ports,
            ContentRole::Structural => return false,
        };
        group
            .entry(parent.to_string())
            .or_default()
            .push(format_line(symbol));
        true
    }

    /// Property lines recorded for a parent.
    pub fn properties(&self, parent: &str) -> &[String] {
        self.properties.get(parent).map_or(&[], Vec::as_slice)
    }

    /// Port lines recorded for a parent.
    pub fn ports(&self, parent: &str) -> &[String] {
        self.ports.get(parent).map_or(&[], Vec::as_slice)
    }

    /// Builds the merged content of a structural symbol.
    pub fn merged_content(&self, symbol: &Symbol) -> Vec<String> {
        let properties = self.properties(symbol.qualified_name());
        let ports = self.ports(symbol.qualified_name());

        let mut content =
            Vec::with_capacity(properties.len() + ports.len() + 1 + symbol.features().len());
        content.extend_from_slice(properties);
        if !ports.is_empty() {
            content.push(PORT_SEPARATOR.to_string());
            content.extend_from_slice(ports);
        }
        content.extend_from_slice(symbol.features());
        content
    }
}
