//! The native surface capability.

use std::fmt;

use parking_lot::Mutex;

use canopy_render::Size;

use crate::content_root::HostHandle;
use crate::window::events::{CloseResponse, NativeEventHub, NativeWindowEvent};
use crate::window::icon::WindowIcon;

/// The part of a native window the hosting layer drives.
///
/// Implementations deliver their native events through [`events`](Self::events).
pub trait NativeSurface: Send + Sync {
    /// Identity of the native window.
    fn handle(&self) -> HostHandle;

    /// Show or hide the native window.
    fn set_visible(&self, visible: bool);

    /// Whether the native window is currently minimized.
    fn is_minimized(&self) -> bool;

    fn set_title(&self, title: &str);

    /// Ask for a new inner size in logical pixels. The platform may refuse.
    fn request_size(&self, size: Size);

    fn set_icon(&self, icon: Option<&WindowIcon>);

    /// The hub this surface dispatches its native events through.
    fn events(&self) -> &NativeEventHub;
}

#[derive(Debug, Default)]
struct HeadlessState {
    visible: bool,
    minimized: bool,
    title: String,
    size: Option<Size>,
    icon: Option<WindowIcon>,
}

/// A surface without a native window behind it.
///
/// Used by headless hosts and tests. The driving methods ([`minimize`],
/// [`restore`], [`request_close`], ...) update the surface state and dispatch
/// the matching native event, the way a platform window would.
///
/// [`minimize`]: HeadlessSurface::minimize
/// [`restore`]: HeadlessSurface::restore
/// [`request_close`]: HeadlessSurface::request_close
pub struct HeadlessSurface {
    handle: HostHandle,
    events: NativeEventHub,
    state: Mutex<HeadlessState>,
}

impl HeadlessSurface {
    /// Create a hidden, restored surface.
    pub fn new(handle: HostHandle) -> Self {
        Self {
            handle,
            events: NativeEventHub::new(),
            state: Mutex::new(HeadlessState::default()),
        }
    }

    /// Create a surface that starts minimized.
    pub fn new_minimized(handle: HostHandle) -> Self {
        let surface = Self::new(handle);
        surface.state.lock().minimized = true;
        surface
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().visible
    }

    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    /// The last size requested through [`NativeSurface::request_size`].
    pub fn requested_size(&self) -> Option<Size> {
        self.state.lock().size
    }

    pub fn icon(&self) -> Option<WindowIcon> {
        self.state.lock().icon.clone()
    }

    /// Minimize and report the state change.
    pub fn minimize(&self) {
        self.set_minimized(true);
    }

    /// Restore and report the state change.
    pub fn restore(&self) {
        self.set_minimized(false);
    }

    fn set_minimized(&self, minimized: bool) {
        self.state.lock().minimized = minimized;
        self.events
            .dispatch(NativeWindowEvent::StateChanged { minimized });
    }

    /// Report an activation change.
    pub fn activate(&self, active: bool) {
        self.events
            .dispatch(NativeWindowEvent::ActivationChanged(active));
    }

    /// Report a close request. Hides the surface unless an observer vetoes.
    pub fn request_close(&self) -> CloseResponse {
        let response = self.events.dispatch(NativeWindowEvent::CloseRequested);
        if !response.is_veto() {
            self.state.lock().visible = false;
        }
        response
    }

    /// Report that the native window is gone.
    pub fn destroy(&self) {
        self.state.lock().visible = false;
        self.events.dispatch(NativeWindowEvent::Destroyed);
    }
}

impl NativeSurface for HeadlessSurface {
    fn handle(&self) -> HostHandle {
        self.handle
    }

    fn set_visible(&self, visible: bool) {
        self.state.lock().visible = visible;
    }

    fn is_minimized(&self) -> bool {
        self.state.lock().minimized
    }

    fn set_title(&self, title: &str) {
        self.state.lock().title = title.to_string();
    }

    fn request_size(&self, size: Size) {
        self.state.lock().size = Some(size);
    }

    fn set_icon(&self, icon: Option<&WindowIcon>) {
        self.state.lock().icon = icon.cloned();
    }

    fn events(&self) -> &NativeEventHub {
        &self.events
    }
}

impl fmt::Debug for HeadlessSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessSurface")
            .field("handle", &self.handle)
            .field("state", &*self.state.lock())
            .finish()
    }
}

static_assertions::assert_impl_all!(HeadlessSurface: Send, Sync);
