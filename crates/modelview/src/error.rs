//! Error types for view rendering.
//!
//! Malformed model input never produces an error: unknown types, dangling
//! references and filtered endpoints are dropped or defaulted while the graph
//! is built. What remains is a small set of genuine failures wrapped by
//! [`ModelViewError`].

use thiserror::Error;

use crate::layout::EngineError;

/// The main error type for view rendering.
#[derive(Debug, Error)]
pub enum ModelViewError {
    /// The hierarchical layout engine failed. Retrying, or falling back to a
    /// different backend, is left to the caller.
    #[error("Layout engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
