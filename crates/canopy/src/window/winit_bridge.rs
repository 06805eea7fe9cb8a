//! `NativeSurface` for winit windows.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::window::Window;

use canopy_core::logging::targets;
use canopy_render::Size;

use crate::content_root::HostHandle;
use crate::window::events::{CloseResponse, NativeEventHub, NativeWindowEvent};
use crate::window::icon::WindowIcon;
use crate::window::surface::NativeSurface;

/// Map a winit window event to the events the hosting layer handles.
///
/// `platform_minimized` is the window's own report, when the platform has
/// one. Without it a zero client size or an occluded window counts as
/// minimized. Events the hosting layer does not handle map to `None`.
pub fn translate_window_event(
    event: &WindowEvent,
    platform_minimized: Option<bool>,
) -> Option<NativeWindowEvent> {
    match event {
        WindowEvent::CloseRequested => Some(NativeWindowEvent::CloseRequested),
        WindowEvent::Focused(focused) => Some(NativeWindowEvent::ActivationChanged(*focused)),
        WindowEvent::Resized(size) => Some(NativeWindowEvent::StateChanged {
            minimized: platform_minimized.unwrap_or(size.width == 0 || size.height == 0),
        }),
        WindowEvent::Occluded(occluded) => Some(NativeWindowEvent::StateChanged {
            minimized: platform_minimized.unwrap_or(*occluded),
        }),
        WindowEvent::Destroyed => Some(NativeWindowEvent::Destroyed),
        _ => None,
    }
}

/// A winit window hosting a content root.
///
/// Feed it the window's events from the application's event loop through
/// [`handle_window_event`](Self::handle_window_event).
pub struct WinitSurface {
    window: Arc<Window>,
    events: NativeEventHub,
    minimized: AtomicBool,
}

impl WinitSurface {
    pub fn new(window: Arc<Window>) -> Self {
        let minimized = window.is_minimized().unwrap_or(false);
        Self {
            window,
            events: NativeEventHub::new(),
            minimized: AtomicBool::new(minimized),
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Dispatch a winit event to the surface's observers.
    ///
    /// Returns the observers' answer for handled events. A
    /// [`CloseResponse::Continue`] to a close request means the application
    /// should drop the window.
    pub fn handle_window_event(&self, event: &WindowEvent) -> Option<CloseResponse> {
        let native = translate_window_event(event, self.window.is_minimized())?;
        if let NativeWindowEvent::StateChanged { minimized } = native {
            self.minimized.store(minimized, Ordering::SeqCst);
        }
        Some(self.events.dispatch(native))
    }
}

impl NativeSurface for WinitSurface {
    fn handle(&self) -> HostHandle {
        HostHandle::from(self.window.id())
    }

    fn set_visible(&self, visible: bool) {
        self.window.set_visible(visible);
    }

    fn is_minimized(&self) -> bool {
        self.window
            .is_minimized()
            .unwrap_or_else(|| self.minimized.load(Ordering::SeqCst))
    }

    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    fn request_size(&self, size: Size) {
        // The new size, if applied synchronously, arrives as a Resized event.
        let _ = self
            .window
            .request_inner_size(LogicalSize::new(size.width as f64, size.height as f64));
    }

    fn set_icon(&self, icon: Option<&WindowIcon>) {
        let icon = match icon.map(WindowIcon::to_winit_icon).transpose() {
            Ok(icon) => icon,
            Err(error) => {
                tracing::warn!(target: targets::ICON, %error, "window icon rejected by the platform");
                return;
            }
        };
        self.window.set_window_icon(icon);
    }

    fn events(&self) -> &NativeEventHub {
        &self.events
    }
}

impl fmt::Debug for WinitSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WinitSurface")
            .field("window", &self.window.id())
            .field("minimized", &self.minimized.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::{PhysicalPosition, PhysicalSize};

    use super::*;

    #[test]
    fn test_translate_close_focus_destroy() {
        assert_eq!(
            translate_window_event(&WindowEvent::CloseRequested, None),
            Some(NativeWindowEvent::CloseRequested)
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Focused(false), None),
            Some(NativeWindowEvent::ActivationChanged(false))
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Destroyed, Some(true)),
            Some(NativeWindowEvent::Destroyed)
        );
    }

    #[test]
    fn test_translate_minimize_heuristics() {
        let zero = WindowEvent::Resized(PhysicalSize::new(0, 0));
        let sized = WindowEvent::Resized(PhysicalSize::new(800, 600));

        assert_eq!(
            translate_window_event(&zero, None),
            Some(NativeWindowEvent::StateChanged { minimized: true })
        );
        assert_eq!(
            translate_window_event(&sized, None),
            Some(NativeWindowEvent::StateChanged { minimized: false })
        );
        // The platform's own answer wins.
        assert_eq!(
            translate_window_event(&zero, Some(false)),
            Some(NativeWindowEvent::StateChanged { minimized: false })
        );
        assert_eq!(
            translate_window_event(&WindowEvent::Occluded(true), None),
            Some(NativeWindowEvent::StateChanged { minimized: true })
        );
    }

    #[test]
    fn test_unhandled_events() {
        let moved = WindowEvent::Moved(PhysicalPosition::new(10, 10));
        assert_eq!(translate_window_event(&moved, None), None);
    }
}
