//! Error types for the hosting layer.

use thiserror::Error;

use canopy_render::RenderError;

use crate::content_root::{ContentRootType, HostHandle};

/// Errors raised while hosting content roots and native windows.
#[derive(Error, Debug)]
pub enum HostError {
    /// A content root already exists for this host.
    #[error("a content root already exists for host {host}")]
    DuplicateRoot { host: HostHandle },

    /// The root visual is not acceptable for this kind of host.
    #[error("invalid root visual for {host_type} host")]
    InvalidRoot { host_type: ContentRootType },

    /// A logo or resource reference could not be interpreted.
    #[error("malformed resource reference {uri:?}: {reason}")]
    MalformedUri { uri: String, reason: String },

    /// A resolved icon could not be decoded.
    #[error("failed to load icon: {0}")]
    IconLoad(String),

    /// Reading a package manifest failed.
    #[error("failed to read package manifest: {0}")]
    Manifest(String),

    /// Building a background failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for hosting operations.
pub type HostResult<T> = Result<T, HostError>;
