//! Native window hosting.
//!
//! A [`NativeWindowAdapter`] connects a [`NativeSurface`] (a winit window, or a
//! [`HeadlessSurface`] in tests) to the application's [`ContentWindow`]. It
//! registers the window's content root, decorates the native window from the
//! package metadata and translates native events into lifecycle transitions.
//!
//! ```
//! use std::sync::Arc;
//!
//! use canopy::window::{ContentWindow, HeadlessSurface, NativeWindowAdapter, PackageManifest, WindowConfig, WindowPhase};
//! use canopy::{HostContext, HostHandle};
//! use canopy_core::{AppLifecycle, SystemNavigation};
//!
//! let context = HostContext::new(
//!     AppLifecycle::new(),
//!     SystemNavigation::new(),
//!     Arc::new(PackageManifest::new("Gallery", ".")),
//! );
//! let surface = Arc::new(HeadlessSurface::new(HostHandle::new(7)));
//! let window = Arc::new(ContentWindow::new());
//! let adapter = NativeWindowAdapter::attach(&context, window.clone(), surface.clone(), &WindowConfig::default())?;
//!
//! window.show();
//! assert_eq!(adapter.phase(), WindowPhase::Foreground);
//!
//! surface.minimize();
//! assert_eq!(adapter.phase(), WindowPhase::Background);
//! # Ok::<(), canopy::HostError>(())
//! ```

mod adapter;
mod config;
mod content_window;
mod events;
mod icon;
mod package;
mod surface;
mod winit_bridge;

pub use adapter::{NativeWindowAdapter, WindowPhase};
pub use config::{DEFAULT_RESOLUTION_SCALE, WindowConfig};
pub use content_window::ContentWindow;
pub use events::{
    CloseResponse, NativeEventHub, NativeWindowEvent, NativeWindowObserver, Subscription,
    SubscriptionId,
};
pub use icon::{
    IconResolver, KNOWN_SCALES, PACKAGE_URI_SCHEME, ResolvedIcon, WindowIcon,
    normalize_logo_reference,
};
pub use package::{MANIFEST_FILE_NAME, PackageManifest, PackageMetadata};
pub use surface::{HeadlessSurface, NativeSurface};
pub use winit_bridge::{WinitSurface, translate_window_event};
