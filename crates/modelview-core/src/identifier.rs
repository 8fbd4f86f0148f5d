//! Node identifiers derived from qualified names.
//!
//! This module provides the [`NodeId`] type. Every structural node of a diagram
//! is identified by an id that is derived from the qualified name of the symbol
//! it was built from, using a fixed encoding that is safe to use as a DOM or
//! engine identifier.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Namespace separator used by qualified names.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Replacement for [`NAMESPACE_SEPARATOR`] inside encoded ids.
const ENCODED_SEPARATOR: &str = "__";

/// Identifier of a node or edge in a diagram graph.
///
/// Ids are plain owned strings. Two ids compare equal iff their encoded text is
/// equal, so the same qualified name always yields the same id across runs.
///
/// # Examples
///
/// ```
/// use modelview_core::identifier::NodeId;
///
/// let id = NodeId::from_qualified_name("Vehicle::engine");
/// assert_eq!(id, "Vehicle__engine");
///
/// let quoted = NodeId::from_qualified_name("Pkg::'front axle'");
/// assert_eq!(quoted, "Pkg___front_axle_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates an id from already encoded text.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Encodes a qualified name into an id.
    ///
    /// Every namespace separator becomes `__` and every character outside
    /// `[A-Za-z0-9_.-]` becomes `_`. The encoding is stable but not guaranteed
    /// to be reversible: `A::B` and `A__B` share the same id.
    pub fn from_qualified_name(qualified_name: &str) -> Self {
        let encoded = qualified_name
            .split(NAMESPACE_SEPARATOR)
            .map(|segment| {
                segment
                    .chars()
                    .map(|c| {
                        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                            c
                        } else {
                            '_'
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(ENCODED_SEPARATOR);
        Self(encoded)
    }

    /// Returns the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns the last namespace segment of a qualified name.
///
/// Both `::` and `.` are accepted as separators; the text after the final one
/// is returned. Names without a separator are returned unchanged.
///
/// # Examples
///
/// ```
/// use modelview_core::identifier::last_segment;
///
/// assert_eq!(last_segment("ISQ::MassValue"), "MassValue");
/// assert_eq!(last_segment("a.b.c"), "c");
/// assert_eq!(last_segment("Real"), "Real");
/// ```
pub fn last_segment(qualified_name: &str) -> &str {
    let after_namespace = qualified_name
        .rsplit_once(NAMESPACE_SEPARATOR)
        .map_or(qualified_name, |(_, tail)| tail);
    after_namespace
        .rsplit_once('.')
        .map_or(after_namespace, |(_, tail)| tail)
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
