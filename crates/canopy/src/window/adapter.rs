//! Drives a [`ContentWindow`] and its content root from native window events.
//!
//! The adapter is a small state machine:
//!
//! ```text
//!            shown                 minimized
//!  Hidden ───────────▶ Foreground ───────────▶ Background
//!     │                    ▲                       │
//!     │ shown (minimized)  └───────────────────────┘
//!     └──────────────────────────▶ Background   restored
//! ```
//!
//! Leaving the background is deferrable: the window only reports itself
//! visible again once every handler of the lifecycle's leaving-background
//! signal has completed its deferral.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use canopy_core::logging::targets;
use canopy_core::{ActivationState, BackgroundReason, ConnectionId, ThreadAffinity};
use canopy_render::{Canvas, Size};

use crate::content_root::{ContentRoot, HostHandle};
use crate::context::HostContext;
use crate::error::HostResult;
use crate::window::config::WindowConfig;
use crate::window::content_window::ContentWindow;
use crate::window::events::{CloseResponse, NativeWindowEvent, NativeWindowObserver, Subscription};
use crate::window::icon::{IconResolver, WindowIcon};
use crate::window::surface::NativeSurface;

/// Lifecycle phase of a hosted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowPhase {
    /// Not shown yet, or torn down.
    #[default]
    Hidden,
    /// Shown and visible.
    Foreground,
    /// Shown but minimized.
    Background,
}

#[derive(Default)]
struct AdapterState {
    phase: WindowPhase,
    is_visible: bool,
    /// Bumped on every visibility transition; stale continuations compare
    /// against it.
    generation: u64,
    closed: bool,
    subscription: Option<Subscription>,
    shown_connection: Option<ConnectionId>,
}

/// Connects one native surface to one [`ContentWindow`].
///
/// Created with [`attach`](Self::attach). The adapter owns the content root
/// registration for the surface's host handle until the window closes or the
/// native window is destroyed.
pub struct NativeWindowAdapter {
    context: HostContext,
    window: Arc<ContentWindow>,
    surface: Arc<dyn NativeSurface>,
    root: Arc<ContentRoot>,
    state: Mutex<AdapterState>,
    affinity: ThreadAffinity,
    me: Weak<NativeWindowAdapter>,
}

impl NativeWindowAdapter {
    /// Host `window` in `surface`.
    ///
    /// Registers a content root for the surface, applies the configured
    /// launch size, the package's display name and its logo, and starts
    /// listening to native events. The surface is made visible when the
    /// window is first shown.
    ///
    /// A logo that cannot be resolved or decoded is logged and skipped.
    ///
    /// # Errors
    ///
    /// Fails with [`HostError::DuplicateRoot`](crate::HostError::DuplicateRoot)
    /// if the surface's host already has a content root.
    pub fn attach(
        context: &HostContext,
        window: Arc<ContentWindow>,
        surface: Arc<dyn NativeSurface>,
        config: &WindowConfig,
    ) -> HostResult<Arc<Self>> {
        let host = surface.handle();
        let root = context
            .coordinator()
            .create_content_root(config.host_type(), config.background(), host)?;

        let adapter = Arc::new_cyclic(|me| Self {
            context: context.clone(),
            window,
            surface,
            root,
            state: Mutex::new(AdapterState::default()),
            affinity: ThreadAffinity::current(),
            me: me.clone(),
        });

        if let Some(size) = config.preferred_launch_size() {
            adapter.surface.request_size(size);
        }
        adapter.apply_package_decoration(config);

        let observer: Weak<dyn NativeWindowObserver> = adapter.me.clone();
        let subscription = adapter.surface.events().subscribe(observer);

        let weak = adapter.me.clone();
        let shown_connection = adapter.window.shown().connect(move |_| {
            if let Some(adapter) = weak.upgrade() {
                adapter.on_shown();
            }
        });

        {
            let mut state = adapter.state.lock();
            state.subscription = Some(subscription);
            state.shown_connection = Some(shown_connection);
        }

        tracing::debug!(target: targets::WINDOW, %host, host_type = %config.host_type(), "window adapter attached");

        if adapter.window.has_shown() {
            adapter.on_shown();
        }
        Ok(adapter)
    }

    fn apply_package_decoration(&self, config: &WindowConfig) {
        let package = self.context.package();

        let title = match package.display_name() {
            "" => config.title(),
            name => name,
        };
        self.surface.set_title(title);

        let Some(logo) = package.logo() else {
            return;
        };
        let resolver = IconResolver::new(config.resolution_scale());
        match resolver.resolve(logo, package.installed_path()) {
            Ok(Some(resolved)) => match WindowIcon::load(&resolved.path) {
                Ok(icon) => self.surface.set_icon(Some(&icon)),
                Err(error) => {
                    tracing::warn!(target: targets::ICON, %error, "failed to load window icon");
                }
            },
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(target: targets::ICON, %error, "ignoring package logo");
            }
        }
    }

    /// The abstract window this adapter drives.
    pub fn window(&self) -> &Arc<ContentWindow> {
        &self.window
    }

    pub fn surface(&self) -> &Arc<dyn NativeSurface> {
        &self.surface
    }

    pub fn content_root(&self) -> &Arc<ContentRoot> {
        &self.root
    }

    pub fn host(&self) -> HostHandle {
        self.root.host()
    }

    pub fn phase(&self) -> WindowPhase {
        self.state.lock().phase
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Lay out the content root at the native window's new client size.
    pub fn resize(&self, size: Size) -> Size {
        self.root.measure_override(size);
        self.root.arrange_override(size)
    }

    /// Paint the content root's background into `canvas`.
    pub fn render(&self, canvas: &mut dyn Canvas) -> HostResult<()> {
        self.root.render(self.context.factory(), canvas)
    }

    /// Ask to close the window, as if the user had.
    pub fn request_close(&self) -> CloseResponse {
        self.on_close_requested()
    }

    fn on_shown(&self) {
        let minimized = self.surface.is_minimized();
        let (connection, generation) = {
            let mut state = self.state.lock();
            if state.closed || state.phase != WindowPhase::Hidden {
                return;
            }
            state.phase = if minimized {
                WindowPhase::Background
            } else {
                WindowPhase::Foreground
            };
            state.is_visible = !minimized;
            state.generation += 1;
            (state.shown_connection.take(), state.generation)
        };

        if let Some(id) = connection {
            self.window.shown().disconnect(id);
        }
        self.surface.set_visible(true);
        tracing::debug!(target: targets::WINDOW, host = %self.host(), minimized, generation, "window shown");

        if !minimized {
            self.window.on_visibility_changed(true);
        }
    }

    fn on_close_requested(&self) -> CloseResponse {
        if self.is_closed() {
            return CloseResponse::Continue;
        }

        let authority = self.context.close_authority();
        if !authority.has_confirmed_close() && !authority.request_app_close() {
            tracing::debug!(target: targets::WINDOW, host = %self.host(), "close vetoed");
            return CloseResponse::Veto;
        }

        self.context.lifecycle().raise_suspending();
        self.teardown();
        CloseResponse::Continue
    }

    fn on_activation_changed(&self, active: bool) {
        let state = if active {
            ActivationState::PointerActivated
        } else {
            ActivationState::Deactivated
        };
        self.root.set_activation_state(state);
        self.window.raise_activated(state);
        self.context.lifecycle().raise_activated(state);
    }

    fn on_state_changed(&self, minimized: bool) {
        let visible = !minimized;
        let generation = {
            let mut state = self.state.lock();
            if state.closed || state.phase == WindowPhase::Hidden || state.is_visible == visible {
                return;
            }
            state.is_visible = visible;
            state.generation += 1;
            state.phase = if visible {
                WindowPhase::Foreground
            } else {
                WindowPhase::Background
            };
            state.generation
        };

        tracing::debug!(target: targets::WINDOW, host = %self.host(), visible, generation, "visibility transition");

        let lifecycle = self.context.lifecycle();
        if visible {
            let weak = self.me.clone();
            lifecycle.raise_leaving_background(Box::new(move || {
                if let Some(adapter) = weak.upgrade() {
                    adapter.finish_leaving_background(generation);
                }
            }));
        } else {
            self.window.on_visibility_changed(false);
            lifecycle.raise_entered_background(BackgroundReason::Minimized);
        }
    }

    /// Report the window visible once leaving the background completed,
    /// unless a later transition or teardown superseded it.
    ///
    /// Runs on whichever thread completes the last deferral, not necessarily
    /// the UI thread. It only takes the state lock and notifies the
    /// `ContentWindow`, so it carries no thread affinity check.
    fn finish_leaving_background(&self, generation: u64) {
        {
            let state = self.state.lock();
            if state.closed || state.generation != generation || !state.is_visible {
                tracing::trace!(target: targets::WINDOW, generation, "stale background exit dropped");
                return;
            }
        }
        self.window.on_visibility_changed(true);
    }

    fn teardown(&self) {
        let (subscription, connection) = {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.phase = WindowPhase::Hidden;
            (state.subscription.take(), state.shown_connection.take())
        };

        drop(subscription);
        if let Some(id) = connection {
            self.window.shown().disconnect(id);
        }
        self.context.coordinator().release_root(&self.root);
        tracing::debug!(target: targets::WINDOW, host = %self.host(), "window adapter torn down");
        self.window.mark_closed();
    }
}

impl Drop for NativeWindowAdapter {
    fn drop(&mut self) {
        if !self.state.get_mut().closed {
            tracing::debug!(target: targets::WINDOW, host = %self.host(), "window adapter dropped while attached");
        }
        self.teardown();
    }
}

impl NativeWindowObserver for NativeWindowAdapter {
    fn on_native_event(&self, event: NativeWindowEvent) -> CloseResponse {
        self.affinity.debug_assert_same_thread("NativeWindowAdapter::on_native_event");
        match event {
            NativeWindowEvent::CloseRequested => return self.on_close_requested(),
            NativeWindowEvent::ActivationChanged(active) => self.on_activation_changed(active),
            NativeWindowEvent::StateChanged { minimized } => self.on_state_changed(minimized),
            NativeWindowEvent::Destroyed => self.teardown(),
        }
        CloseResponse::Continue
    }
}

impl fmt::Debug for NativeWindowAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("NativeWindowAdapter")
            .field("host", &self.root.host())
            .field("phase", &state.phase)
            .field("is_visible", &state.is_visible)
            .field("generation", &state.generation)
            .field("closed", &state.closed)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(NativeWindowAdapter: Send, Sync);
