//! Close negotiation between native hosts and the application.
//!
//! When the user asks a native window to close, the host first checks whether
//! the application already confirmed it wants to close. If not, it asks the
//! application through [`CloseAuthorization::request_app_close`], which may
//! veto. A veto is an ordinary outcome, not an error.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::logging::targets;
use crate::signal::Signal;

/// Capability consulted by window hosts before letting a window close.
pub trait CloseAuthorization: Send + Sync {
    /// Whether the application has already confirmed its intent to close.
    fn has_confirmed_close(&self) -> bool;

    /// Ask the application to authorize closing. `true` means authorized.
    fn request_app_close(&self) -> bool;
}

/// Arguments passed to [`SystemNavigation::close_requested`] handlers.
///
/// Setting the request handled vetoes the close.
#[derive(Clone, Default)]
pub struct CloseRequestedEventArgs {
    handled: Arc<AtomicBool>,
}

impl CloseRequestedEventArgs {
    /// Mark the request handled, keeping the application open.
    pub fn set_handled(&self, handled: bool) {
        self.handled.store(handled, Ordering::SeqCst);
    }

    /// Whether a handler vetoed the close.
    pub fn is_handled(&self) -> bool {
        self.handled.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CloseRequestedEventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseRequestedEventArgs")
            .field("handled", &self.is_handled())
            .finish()
    }
}

/// Stock [`CloseAuthorization`] backed by a signal.
///
/// # Example
///
/// ```
/// use canopy_core::{CloseAuthorization, SystemNavigation};
///
/// let navigation = SystemNavigation::new();
/// let handler = navigation.close_requested().connect(|args| {
///     // Unsaved changes: keep the window open.
///     args.set_handled(true);
/// });
/// assert!(!navigation.request_app_close());
///
/// navigation.close_requested().disconnect(handler);
/// assert!(navigation.request_app_close());
/// assert!(navigation.has_confirmed_close());
/// ```
#[derive(Default)]
pub struct SystemNavigation {
    confirmed: AtomicBool,
    close_requested: Signal<CloseRequestedEventArgs>,
}

impl SystemNavigation {
    /// Create a navigation service with no handlers.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record that the application has decided to close.
    ///
    /// Subsequent close requests are not forwarded to handlers.
    pub fn confirm_close(&self) {
        self.confirmed.store(true, Ordering::SeqCst);
    }

    /// Signal emitted when a host asks whether the application may close.
    pub fn close_requested(&self) -> &Signal<CloseRequestedEventArgs> {
        &self.close_requested
    }
}

impl CloseAuthorization for SystemNavigation {
    fn has_confirmed_close(&self) -> bool {
        self.confirmed.load(Ordering::SeqCst)
    }

    fn request_app_close(&self) -> bool {
        let args = CloseRequestedEventArgs::default();
        self.close_requested.emit(args.clone());

        if args.is_handled() {
            tracing::debug!(target: targets::NAVIGATION, "close vetoed by application");
            return false;
        }

        self.confirm_close();
        tracing::debug!(target: targets::NAVIGATION, "close authorized");
        true
    }
}

impl fmt::Debug for SystemNavigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemNavigation")
            .field("confirmed", &self.has_confirmed_close())
            .field("handlers", &self.close_requested.connection_count())
            .finish()
    }
}

static_assertions::assert_impl_all!(SystemNavigation: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_authorized_without_handlers() {
        let navigation = SystemNavigation::new();
        assert!(!navigation.has_confirmed_close());
        assert!(navigation.request_app_close());
        assert!(navigation.has_confirmed_close());
    }

    #[test]
    fn test_handler_vetoes_close() {
        let navigation = SystemNavigation::new();
        navigation.close_requested().connect(|args| args.set_handled(true));
        assert!(!navigation.request_app_close());
        assert!(!navigation.has_confirmed_close());
    }

    #[test]
    fn test_confirm_close() {
        let navigation = SystemNavigation::new();
        navigation.confirm_close();
        assert!(navigation.has_confirmed_close());
    }
}
