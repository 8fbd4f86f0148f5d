//! Layout backends for positioning diagram graphs.
//!
//! # Pipeline Position
//!
//! ```text
//! Symbols + Relationships + ViewConfig
//!     ↓ structure
//! DiagramGraph (sized, unpositioned)
//!     ↓ layout (this module)
//! DiagramGraph (positioned)
//!     ↓ render
//! RenderedView
//! ```
//!
//! Exactly one backend positions a graph per call:
//!
//! - [`hierarchical`] - Delegates to a [`HierarchicalEngine`], keeping
//!   containment. [`SugiyamaEngine`] is the bundled engine.
//! - [`LevelLayout`] - Breadth-first levels from the root nodes.
//! - [`GridLayout`] - Square-ish grid in input order.

mod engines;
pub mod hierarchical;

pub use engines::{GridLayout, LevelLayout, PositionEngine, Positions};
pub use hierarchical::{EngineError, HierarchicalEngine, SugiyamaEngine};
