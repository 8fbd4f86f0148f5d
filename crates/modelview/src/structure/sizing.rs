//! Node size calculation.
//!
//! Sizes are derived from fixed per-row and per-section constants. A node's
//! content lines are grouped into sections (attributes, parts, actions) by a
//! keyword heuristic; each non-empty section adds a section header row.
//!
//! Containers additionally expose a top padding: the height taken by their
//! header and own content plus a gap. Layout engines must keep nested nodes
//! below that line so content and children never overlap.

use modelview_core::geometry::Size;

use super::content::{PORT_SEPARATOR, TYPE_SEPARATOR};

/// Height of the node header (keyword and name).
pub const HEADER_HEIGHT: f32 = 40.0;
/// Height of a section header row.
pub const SECTION_HEADER_HEIGHT: f32 = 20.0;
/// Height of one content line.
pub const ITEM_HEIGHT: f32 = 18.0;
/// Padding below the last content line.
pub const BOTTOM_PADDING: f32 = 10.0;
/// Gap between a container's content and its first nested node.
pub const CHILD_GAP: f32 = 20.0;
/// Estimated width of one character of content text.
pub const CHAR_WIDTH: f32 = 7.0;
/// Horizontal padding around content text.
pub const HORIZONTAL_PADDING: f32 = 24.0;
/// Minimum width of a leaf node.
pub const MIN_WIDTH: f32 = 180.0;
/// Minimum width of a container.
pub const CONTAINER_MIN_WIDTH: f32 = 300.0;
/// Minimum height of a container.
pub const CONTAINER_MIN_HEIGHT: f32 = 200.0;

/// Section a content line is displayed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Attributes,
    Parts,
    Actions,
}

impl Section {
    /// Assigns a content line to a section.
    ///
    /// Lines mentioning `action` are actions; lines without a type separator
    /// or mentioning `attr` are attributes; all other lines are parts. The
    /// port separator belongs to no section.
    pub fn of_line(line: &str) -> Option<Self> {
        if line == PORT_SEPARATOR {
            return None;
        }
        let lower = line.to_lowercase();
        if lower.contains("action") {
            Some(Self::Actions)
        } else if !line.contains(TYPE_SEPARATOR) || lower.contains("attr") {
            Some(Self::Attributes)
        } else {
            Some(Self::Parts)
        }
    }
}

/// Computed size of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSize {
    size: Size,
    top_padding: f32,
}

impl NodeSize {
    pub fn size(&self) -> Size {
        self.size
    }

    /// Space a container reserves above its nested nodes.
    pub fn top_padding(&self) -> f32 {
        self.top_padding
    }
}

/// Computes the size of a node from its content.
///
/// The result depends only on the content and the container flag.
///
/// # Examples
///
/// ```
/// use modelview::structure::sizing::{self, HEADER_HEIGHT};
///
/// let empty = sizing::calculate(&[], false);
/// assert_eq!(empty.size().height(), HEADER_HEIGHT);
///
/// let one_line = sizing::calculate(&["mass : Real".to_string()], false);
/// assert!(one_line.size().height() > HEADER_HEIGHT);
/// ```
pub fn calculate(content: &[String], is_container: bool) -> NodeSize {
    let content_height = content_height(content);
    let width = content
        .iter()
        .map(|line| line.chars().count() as f32 * CHAR_WIDTH + HORIZONTAL_PADDING)
        .fold(MIN_WIDTH, f32::max);
    let height = if content.is_empty() {
        HEADER_HEIGHT
    } else {
        HEADER_HEIGHT + content_height + BOTTOM_PADDING
    };
    let top_padding = HEADER_HEIGHT + content_height + CHILD_GAP;

    let size = if is_container {
        Size::new(width, height).max(Size::new(CONTAINER_MIN_WIDTH, CONTAINER_MIN_HEIGHT))
    } else {
        Size::new(width, height)
    };

    NodeSize { size, top_padding }
}

/// Height of the section headers and content lines, without header or padding.
fn content_height(content: &[String]) -> f32 {
    let mut sections = Vec::with_capacity(3);
    for section in content.iter().filter_map(|line| Section::of_line(line)) {
        if !sections.contains(&section) {
            sections.push(section);
        }
    }
    sections.len() as f32 * SECTION_HEADER_HEIGHT + content.len() as f32 * ITEM_HEIGHT
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn lines(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_section_of_line() {
        assert_eq!(Section::of_line("mass : Real"), Some(Section::Parts));
        assert_eq!(Section::of_line("mass"), Some(Section::Attributes));
        assert_eq!(Section::of_line("attr : Real"), Some(Section::Attributes));
        assert_eq!(Section::of_line("do Action1"), Some(Section::Actions));
        assert_eq!(Section::of_line(PORT_SEPARATOR), None);
    }

    #[test]
    fn test_empty_leaf_is_header_only() {
        let node = calculate(&[], false);
        assert_approx_eq!(f32, node.size().height(), HEADER_HEIGHT);
        assert_approx_eq!(f32, node.size().width(), MIN_WIDTH);
    }

    #[test]
    fn test_single_line_height() {
        let node = calculate(&lines(&["engine : Engine"]), false);
        assert_approx_eq!(
            f32,
            node.size().height(),
            HEADER_HEIGHT + SECTION_HEADER_HEIGHT + ITEM_HEIGHT + BOTTOM_PADDING
        );
    }

    #[test]
    fn test_new_section_adds_header_row() {
        let one_section = calculate(&lines(&["a : A", "b : B"]), false);
        let two_sections = calculate(&lines(&["a : A", "b"]), false);
        assert_approx_eq!(
            f32,
            two_sections.size().height() - one_section.size().height(),
            SECTION_HEADER_HEIGHT
        );
    }

    #[test]
    fn test_separator_counts_as_row_only() {
        let without = calculate(&lines(&["x : T", "in p"]), false);
        let with = calculate(&lines(&["x : T", "---", "in p"]), false);
        assert_approx_eq!(
            f32,
            with.size().height() - without.size().height(),
            ITEM_HEIGHT
        );
    }

    #[test]
    fn test_width_grows_with_long_lines() {
        let long_line = "a".repeat(60);
        let node = calculate(&[long_line], false);
        assert_approx_eq!(
            f32,
            node.size().width(),
            60.0 * CHAR_WIDTH + HORIZONTAL_PADDING
        );
    }

    #[test]
    fn test_container_floor() {
        let node = calculate(&lines(&["x : T"]), true);
        assert_approx_eq!(f32, node.size().width(), CONTAINER_MIN_WIDTH);
        assert_approx_eq!(f32, node.size().height(), CONTAINER_MIN_HEIGHT);
    }

    #[test]
    fn test_container_top_padding_covers_content() {
        let content = lines(&["x : T", "y", "---", "in p"]);
        let node = calculate(&content, true);
        // two sections, four rows
        let expected = HEADER_HEIGHT + 2.0 * SECTION_HEADER_HEIGHT + 4.0 * ITEM_HEIGHT + CHILD_GAP;
        assert_approx_eq!(f32, node.top_padding(), expected);
    }

    #[test]
    fn test_empty_container_top_padding() {
        let node = calculate(&[], true);
        assert_approx_eq!(f32, node.top_padding(), HEADER_HEIGHT + CHILD_GAP);
    }
}
