//! Error types for bookfold.
//!
//! Degenerate geometry is never an error (it resolves to an empty, no-draw
//! transform) and precondition violations such as an out-of-range focus page
//! panic. What remains are configuration mistakes and failures reported by
//! host-supplied collaborators.

use thiserror::Error;

/// Primary error type for the composition engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid viewer parameters: {0}")]
    InvalidParams(String),

    #[error("document has no pages")]
    EmptyDocument,

    #[error("page {0} is not available")]
    PageUnavailable(usize),

    #[error("failed to create resource for page {page}: {msg}")]
    Render { page: usize, msg: String },

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

/// Convenience Result type alias for LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;
