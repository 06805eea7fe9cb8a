//! Error types for the render crate.

use thiserror::Error;

use crate::brush::BrushKind;

/// Errors that can occur while resolving brushes into paints and drawables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The brush has no paint representation.
    #[error("brush kind {kind} has no paint representation")]
    UnsupportedBrush { kind: BrushKind },

    /// The requested operation is not available for this input.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
