//! Error types for Canopy core.

use std::fmt;

/// Errors raised by the core signal machinery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The connection ID is invalid or has already been disconnected.
    InvalidConnection,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConnection => write!(f, "Invalid or disconnected connection ID"),
        }
    }
}

impl std::error::Error for CoreError {}

/// A specialized Result type for Canopy core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
