//! Modelview Core Types and Definitions
//!
//! This crate provides the foundational types shared by the model view layout
//! pipeline. It includes:
//!
//! - **Identifiers**: Node ids derived from qualified names ([`identifier::NodeId`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Semantic**: Input model types for views ([`semantic`] module)

pub mod geometry;
pub mod identifier;
pub mod semantic;
