//! Semantic input model.
//!
//! These types describe what an upstream model adapter hands to the layout
//! pipeline. They are plain in-memory values; nothing here knows about
//! layout.
//!
//! # Pipeline Position
//!
//! ```text
//! Symbols + Relationships + ViewConfig (these types)
//!     ↓ structure
//! DiagramGraph (classified, aggregated, sized)
//!     ↓ layout
//! Positioned DiagramGraph
//!     ↓ render
//! RenderedView
//! ```
//!
//! # Organization
//!
//! - [`element`] - [`Symbol`], [`Relationship`], [`PortDirection`]
//! - [`kind`] - [`NodeKind`] and its configuration table
//! - [`view`] - [`ViewConfig`], [`ViewType`], [`LayoutDirection`]

pub mod element;
pub mod kind;
pub mod view;

pub use element::*;
pub use kind::*;
pub use view::*;
