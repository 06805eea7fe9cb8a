//! Application lifecycle context.
//!
//! [`AppLifecycle`] is the process-wide application model the hosting layer
//! reports into. It is constructed once by the host and passed explicitly to
//! every coordinator and window adapter; there is no hidden global.
//!
//! # Leaving background
//!
//! Returning from the background may need asynchronous work (re-acquiring a
//! rendering surface, reloading resources) before the UI is told it is
//! visible again. [`AppLifecycle::raise_leaving_background`] therefore takes a
//! continuation which runs exactly once, after every handler has returned and
//! every [`Deferral`] taken from the event arguments has completed.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use canopy_core::AppLifecycle;
//!
//! let app = AppLifecycle::new();
//! let parked = Arc::new(parking_lot::Mutex::new(None));
//! let parked_clone = parked.clone();
//! app.leaving_background().connect(move |args| {
//!     // Hold the transition open until the surface is ready.
//!     *parked_clone.lock() = Some(args.get_deferral());
//! });
//!
//! let visible = Arc::new(AtomicBool::new(false));
//! let visible_clone = visible.clone();
//! app.raise_leaving_background(Box::new(move || visible_clone.store(true, Ordering::SeqCst)));
//! assert!(!visible.load(Ordering::SeqCst));
//!
//! parked.lock().take().unwrap().complete();
//! assert!(visible.load(Ordering::SeqCst));
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::logging::targets;
use crate::signal::Signal;

/// Single-shot callback run once a background exit completes.
pub type Continuation = Box<dyn FnOnce() + Send + 'static>;

/// How a window became active or inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationState {
    /// Activated programmatically.
    CodeActivated,
    /// The window lost activation.
    Deactivated,
    /// Activated by user interaction with the native window.
    PointerActivated,
}

impl ActivationState {
    /// Whether this state represents an active window.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Deactivated)
    }
}

impl fmt::Display for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CodeActivated => write!(f, "CodeActivated"),
            Self::Deactivated => write!(f, "Deactivated"),
            Self::PointerActivated => write!(f, "PointerActivated"),
        }
    }
}

/// Why the application entered the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackgroundReason {
    /// The host surface was minimized.
    Minimized,
    /// The host did not say.
    #[default]
    Unspecified,
}

/// Coarse application state derived from the raised lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApplicationState {
    /// At least one surface is in the foreground.
    #[default]
    Foreground,
    /// The application entered the background.
    Background,
    /// The application is suspending (a window is closing).
    Suspending,
}

/// Arguments for [`AppLifecycle::entered_background`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnteredBackgroundEventArgs {
    /// Why the background was entered.
    pub reason: BackgroundReason,
}

/// Shared state of one leaving-background sequence.
struct BackgroundExit {
    /// One count for the emission itself plus one per live deferral.
    pending: AtomicUsize,
    continuation: Mutex<Option<Continuation>>,
}

impl BackgroundExit {
    fn new(continuation: Continuation) -> Self {
        Self {
            pending: AtomicUsize::new(1),
            continuation: Mutex::new(Some(continuation)),
        }
    }

    fn acquire(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) != 1 {
            return;
        }
        let continuation = self.continuation.lock().take();
        match continuation {
            Some(continuation) => {
                tracing::debug!(target: targets::LIFECYCLE, "background exit complete, running continuation");
                continuation();
            }
            None => {
                tracing::trace!(target: targets::LIFECYCLE, "background exit already completed");
            }
        }
    }
}

/// Arguments for [`AppLifecycle::leaving_background`].
///
/// Handlers that need to finish work before the UI becomes visible take a
/// [`Deferral`] and complete it when done.
#[derive(Clone)]
pub struct LeavingBackgroundEventArgs {
    sequence: Arc<BackgroundExit>,
}

impl LeavingBackgroundEventArgs {
    /// Delay completion of the background exit until the deferral completes.
    pub fn get_deferral(&self) -> Deferral {
        self.sequence.acquire();
        Deferral {
            sequence: Some(self.sequence.clone()),
        }
    }
}

impl fmt::Debug for LeavingBackgroundEventArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeavingBackgroundEventArgs")
            .field("pending", &self.sequence.pending.load(Ordering::SeqCst))
            .finish()
    }
}

/// A pending hold on a background exit.
///
/// Completing (or dropping) the deferral releases the hold. It may be
/// completed from any thread.
pub struct Deferral {
    sequence: Option<Arc<BackgroundExit>>,
}

impl Deferral {
    /// Release this hold on the background exit.
    pub fn complete(mut self) {
        if let Some(sequence) = self.sequence.take() {
            sequence.release();
        }
    }
}

impl Drop for Deferral {
    fn drop(&mut self) {
        if let Some(sequence) = self.sequence.take() {
            sequence.release();
        }
    }
}

impl fmt::Debug for Deferral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferral")
            .field("pending", &self.sequence.is_some())
            .finish()
    }
}

/// The abstract application model.
///
/// Hosts construct one per process and share it as `Arc<AppLifecycle>`.
pub struct AppLifecycle {
    activated: Signal<ActivationState>,
    suspending: Signal<()>,
    entered_background: Signal<EnteredBackgroundEventArgs>,
    leaving_background: Signal<LeavingBackgroundEventArgs>,
    state: Mutex<ApplicationState>,
}

impl Default for AppLifecycle {
    fn default() -> Self {
        Self {
            activated: Signal::new(),
            suspending: Signal::new(),
            entered_background: Signal::new(),
            leaving_background: Signal::new(),
            state: Mutex::new(ApplicationState::Foreground),
        }
    }
}

impl AppLifecycle {
    /// Create the application lifecycle context.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Current coarse application state.
    pub fn state(&self) -> ApplicationState {
        *self.state.lock()
    }

    /// Report an activation change of one of the application's windows.
    pub fn raise_activated(&self, state: ActivationState) {
        tracing::debug!(target: targets::LIFECYCLE, %state, "activated");
        self.activated.emit(state);
    }

    /// Report that the application is suspending.
    pub fn raise_suspending(&self) {
        tracing::info!(target: targets::LIFECYCLE, "suspending");
        *self.state.lock() = ApplicationState::Suspending;
        self.suspending.emit(());
    }

    /// Report that the application moved to the background.
    pub fn raise_entered_background(&self, reason: BackgroundReason) {
        tracing::debug!(target: targets::LIFECYCLE, ?reason, "entered background");
        *self.state.lock() = ApplicationState::Background;
        self.entered_background
            .emit(EnteredBackgroundEventArgs { reason });
    }

    /// Report that the application is leaving the background.
    ///
    /// `continuation` runs exactly once, after all handlers returned and all
    /// deferrals they took completed. If no handler defers, it runs before this
    /// method returns.
    pub fn raise_leaving_background(&self, continuation: Continuation) {
        tracing::debug!(target: targets::LIFECYCLE, "leaving background");
        *self.state.lock() = ApplicationState::Foreground;
        let sequence = Arc::new(BackgroundExit::new(continuation));
        self.leaving_background.emit(LeavingBackgroundEventArgs {
            sequence: sequence.clone(),
        });
        sequence.release();
    }

    /// Signal emitted on window activation changes.
    pub fn activated(&self) -> &Signal<ActivationState> {
        &self.activated
    }

    /// Signal emitted when the application suspends.
    pub fn suspending(&self) -> &Signal<()> {
        &self.suspending
    }

    /// Signal emitted when the application enters the background.
    pub fn entered_background(&self) -> &Signal<EnteredBackgroundEventArgs> {
        &self.entered_background
    }

    /// Signal emitted when the application starts leaving the background.
    pub fn leaving_background(&self) -> &Signal<LeavingBackgroundEventArgs> {
        &self.leaving_background
    }
}

impl fmt::Debug for AppLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppLifecycle")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(AppLifecycle: Send, Sync);
static_assertions::assert_impl_all!(Deferral: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn counting_continuation(counter: &Arc<AtomicU32>) -> Continuation {
        let counter = counter.clone();
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_continuation_runs_immediately_without_deferrals() {
        let app = AppLifecycle::new();
        let runs = Arc::new(AtomicU32::new(0));
        app.raise_leaving_background(counting_continuation(&runs));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(app.state(), ApplicationState::Foreground);
    }

    #[test]
    fn test_continuation_waits_for_all_deferrals() {
        let app = AppLifecycle::new();
        let held = Arc::new(Mutex::new(Vec::new()));
        for _ in 0..2 {
            let held = held.clone();
            app.leaving_background().connect(move |args| {
                held.lock().push(args.get_deferral());
            });
        }

        let runs = Arc::new(AtomicU32::new(0));
        app.raise_leaving_background(counting_continuation(&runs));
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        let first = held.lock().remove(0);
        first.complete();
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        let second = held.lock().remove(0);
        second.complete();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_deferral_completes() {
        let app = AppLifecycle::new();
        let held = Arc::new(Mutex::new(None));
        let held_clone = held.clone();
        app.leaving_background().connect(move |args| {
            *held_clone.lock() = Some(args.get_deferral());
        });

        let runs = Arc::new(AtomicU32::new(0));
        app.raise_leaving_background(counting_continuation(&runs));
        drop(held.lock().take());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_late_deferral_does_not_rerun_continuation() {
        let app = AppLifecycle::new();
        let stash = Arc::new(Mutex::new(None));
        let stash_clone = stash.clone();
        app.leaving_background().connect(move |args| {
            *stash_clone.lock() = Some(args.clone());
        });

        let runs = Arc::new(AtomicU32::new(0));
        app.raise_leaving_background(counting_continuation(&runs));
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        let args = stash.lock().take().unwrap();
        args.get_deferral().complete();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deferral_completed_on_other_thread() {
        let app = AppLifecycle::new();
        let held = Arc::new(Mutex::new(None));
        let held_clone = held.clone();
        app.leaving_background().connect(move |args| {
            *held_clone.lock() = Some(args.get_deferral());
        });

        let runs = Arc::new(AtomicU32::new(0));
        app.raise_leaving_background(counting_continuation(&runs));
        let deferral = held.lock().take().unwrap();
        std::thread::spawn(move || deferral.complete()).join().unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_state_tracking() {
        let app = AppLifecycle::new();
        app.raise_entered_background(BackgroundReason::Minimized);
        assert_eq!(app.state(), ApplicationState::Background);
        app.raise_suspending();
        assert_eq!(app.state(), ApplicationState::Suspending);
    }

    #[test]
    fn test_activation_state() {
        assert!(ActivationState::PointerActivated.is_active());
        assert!(ActivationState::CodeActivated.is_active());
        assert!(!ActivationState::Deactivated.is_active());
        assert_eq!(ActivationState::Deactivated.to_string(), "Deactivated");
    }
}
