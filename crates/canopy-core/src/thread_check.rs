//! Thread affinity checks.
//!
//! Every content root lives on the native event-dispatch thread of its host.
//! Types that must only be touched from that thread carry a
//! [`ThreadAffinity`] captured at construction and assert against it.
//!
//! ```
//! use canopy_core::thread_check::ThreadAffinity;
//!
//! struct Root {
//!     affinity: ThreadAffinity,
//! }
//!
//! impl Root {
//!     fn arrange(&self) {
//!         self.affinity.debug_assert_same_thread("Root::arrange");
//!     }
//! }
//!
//! Root { affinity: ThreadAffinity::current() }.arrange();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::ThreadId;

/// Flag to enable/disable runtime thread checks globally.
static THREAD_CHECKS_ENABLED: AtomicBool = AtomicBool::new(cfg!(debug_assertions));

/// Enable or disable thread affinity checks at runtime.
///
/// Checks default to enabled in debug builds and disabled in release builds.
pub fn set_thread_checks_enabled(enabled: bool) {
    THREAD_CHECKS_ENABLED.store(enabled, Ordering::SeqCst);
}

/// Check whether thread affinity checks are currently enabled.
#[inline]
pub fn thread_checks_enabled() -> bool {
    THREAD_CHECKS_ENABLED.load(Ordering::Relaxed)
}

/// Records the thread an object was created on.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Panic if called from a different thread, when checks are enabled.
    ///
    /// `operation` names the call site in the panic message.
    #[track_caller]
    pub fn assert_same_thread(&self, operation: &str) {
        if thread_checks_enabled() && !self.is_same_thread() {
            panic!(
                "{operation} called from thread {:?}, but the object belongs to thread {:?}",
                std::thread::current().id(),
                self.thread_id
            );
        }
    }

    /// Like [`assert_same_thread`](Self::assert_same_thread), compiled out of
    /// release builds.
    #[inline]
    #[track_caller]
    pub fn debug_assert_same_thread(&self, operation: &str) {
        if cfg!(debug_assertions) {
            self.assert_same_thread(operation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        affinity.assert_same_thread("test");
    }

    #[test]
    fn test_affinity_other_thread() {
        let affinity = ThreadAffinity::current();
        let on_other = std::thread::spawn(move || affinity.is_same_thread())
            .join()
            .unwrap();
        assert!(!on_other);
    }
}
