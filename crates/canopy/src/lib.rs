//! Canopy - content-root hosting for native windows and islands.
//!
//! Canopy sits between an abstract visual tree and the native surfaces it is
//! shown in:
//!
//! - **Content roots**: one [`ContentRoot`] per native host, created and
//!   released through the [`ContentRootCoordinator`]
//! - **Islands**: [`IslandHost`] embeds a transparent root inside foreign UI
//! - **Windows**: [`window::NativeWindowAdapter`] drives a window's lifecycle
//!   (shown, activation, minimize and restore, close negotiation) and
//!   decorates it from the application package
//! - **Backgrounds**: roots paint their background through
//!   [`canopy_render::DrawableFactory`]
//!
//! The lifecycle and close-negotiation services live in [`canopy_core`] and are
//! threaded through hosts explicitly with a [`HostContext`].
//!
//! # Example
//!
//! ```
//! use canopy::{Border, ContentRootCoordinator, ContentRootType, HostHandle};
//! use canopy_render::{Color, Size};
//!
//! let coordinator = ContentRootCoordinator::new();
//! let root = coordinator.create_content_root(
//!     ContentRootType::PrimaryWindow,
//!     Color::WHITE,
//!     HostHandle::new(1),
//! )?;
//! root.set_public_root_visual(Some(Border::new(Size::new(100.0, 50.0)).into_ref()))?;
//! assert_eq!(root.arrange_override(Size::new(800.0, 600.0)), Size::new(800.0, 600.0));
//! # Ok::<(), canopy::HostError>(())
//! ```

mod content_root;
mod context;
mod coordinator;
mod error;
mod island;
mod visual;
pub mod window;

pub use content_root::{ContentRoot, ContentRootType, HostHandle};
pub use context::HostContext;
pub use coordinator::ContentRootCoordinator;
pub use error::{HostError, HostResult};
pub use island::IslandHost;
pub use visual::{Border, Visual, VisualRef, VisualTree};
pub use window::{ContentWindow, NativeWindowAdapter, WindowConfig};

/// Re-export of the render crate.
pub mod render {
    pub use canopy_render::*;
}
