//! The platform-independent window model.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use canopy_core::logging::targets;
use canopy_core::{ActivationState, Signal};

/// The application's view of a window.
///
/// Native adapters translate platform events into calls on this type;
/// application code listens to its signals.
pub struct ContentWindow {
    shown: Signal<()>,
    activated: Signal<ActivationState>,
    visibility_changed: Signal<bool>,
    closed: Signal<()>,
    has_shown: AtomicBool,
    is_closed: AtomicBool,
    /// Last visibility emitted, `None` before the first emission.
    visible: Mutex<Option<bool>>,
    activation: Mutex<Option<ActivationState>>,
}

impl Default for ContentWindow {
    fn default() -> Self {
        Self {
            shown: Signal::new(),
            activated: Signal::new(),
            visibility_changed: Signal::new(),
            closed: Signal::new(),
            has_shown: AtomicBool::new(false),
            is_closed: AtomicBool::new(false),
            visible: Mutex::new(None),
            activation: Mutex::new(None),
        }
    }
}

impl ContentWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the window. Only the first call emits [`shown`](Self::shown).
    ///
    /// Returns `true` if this call showed the window.
    pub fn show(&self) -> bool {
        if self.is_closed() || self.has_shown.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::debug!(target: targets::WINDOW, "content window shown");
        self.shown.emit(());
        true
    }

    pub fn has_shown(&self) -> bool {
        self.has_shown.load(Ordering::SeqCst)
    }

    /// Report an activation change.
    pub fn raise_activated(&self, state: ActivationState) {
        *self.activation.lock() = Some(state);
        self.activated.emit(state);
    }

    /// The last reported activation state.
    pub fn activation_state(&self) -> Option<ActivationState> {
        *self.activation.lock()
    }

    /// Report a visibility change.
    ///
    /// Repeating the last reported value emits nothing. Returns `true` if
    /// [`visibility_changed`](Self::visibility_changed) was emitted.
    pub fn on_visibility_changed(&self, visible: bool) -> bool {
        {
            let mut last = self.visible.lock();
            if *last == Some(visible) {
                tracing::trace!(target: targets::WINDOW, visible, "duplicate visibility suppressed");
                return false;
            }
            *last = Some(visible);
        }
        tracing::debug!(target: targets::WINDOW, visible, "visibility changed");
        self.visibility_changed.emit(visible);
        true
    }

    /// Whether the window is visible, as last reported.
    pub fn is_visible(&self) -> bool {
        self.visible.lock().unwrap_or(false)
    }

    /// Mark the window closed. Only the first call emits
    /// [`closed`](Self::closed).
    pub fn mark_closed(&self) -> bool {
        if self.is_closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::debug!(target: targets::WINDOW, "content window closed");
        self.closed.emit(());
        true
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed.load(Ordering::SeqCst)
    }

    /// Emitted once, the first time the window is shown.
    pub fn shown(&self) -> &Signal<()> {
        &self.shown
    }

    pub fn activated(&self) -> &Signal<ActivationState> {
        &self.activated
    }

    /// Emitted on each visibility change. `false` comes from the UI thread;
    /// `true` comes from whichever thread completed the last deferral of the
    /// application's background exit.
    pub fn visibility_changed(&self) -> &Signal<bool> {
        &self.visibility_changed
    }

    pub fn closed(&self) -> &Signal<()> {
        &self.closed
    }
}

impl fmt::Debug for ContentWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentWindow")
            .field("has_shown", &self.has_shown())
            .field("visible", &*self.visible.lock())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ContentWindow: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_shown_fires_once() {
        let window = ContentWindow::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        window.shown().connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(window.show());
        assert!(!window.show());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_visibility_deduplicated() {
        let window = ContentWindow::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        window
            .visibility_changed()
            .connect(move |visible| s.lock().push(*visible));

        window.on_visibility_changed(true);
        window.on_visibility_changed(true);
        window.on_visibility_changed(false);
        window.on_visibility_changed(false);
        window.on_visibility_changed(true);

        assert_eq!(*seen.lock(), vec![true, false, true]);
        assert!(window.is_visible());
    }

    #[test]
    fn test_closed_window_cannot_show() {
        let window = ContentWindow::new();
        assert!(window.mark_closed());
        assert!(!window.mark_closed());
        assert!(!window.show());
    }
}
