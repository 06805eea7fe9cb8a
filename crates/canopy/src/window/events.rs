//! Native window events and observer subscriptions.
//!
//! A native surface pushes [`NativeWindowEvent`]s through its
//! [`NativeEventHub`]. Observers register with [`NativeEventHub::subscribe`]
//! and stay registered for as long as the returned [`Subscription`] lives.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use canopy_core::logging::{span_names, targets};
use canopy_core::{CoreError, Result as CoreResult};

/// An event reported by a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeWindowEvent {
    /// The user asked to close the window.
    CloseRequested,
    /// The window gained (`true`) or lost (`false`) activation.
    ActivationChanged(bool),
    /// The window's minimized state may have changed.
    StateChanged { minimized: bool },
    /// The native window is gone.
    Destroyed,
}

/// An observer's answer to a native event.
///
/// Only meaningful for [`NativeWindowEvent::CloseRequested`]; everything else
/// answers [`CloseResponse::Continue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseResponse {
    /// Let the native window proceed.
    #[default]
    Continue,
    /// Keep the window open.
    Veto,
}

impl CloseResponse {
    pub fn is_veto(self) -> bool {
        matches!(self, Self::Veto)
    }
}

/// Receives native window events.
pub trait NativeWindowObserver: Send + Sync {
    fn on_native_event(&self, event: NativeWindowEvent) -> CloseResponse;
}

new_key_type! {
    /// Identifies an observer registration on a [`NativeEventHub`].
    pub struct SubscriptionId;
}

type Observers = Mutex<SlotMap<SubscriptionId, Weak<dyn NativeWindowObserver>>>;

/// Fans native events out to registered observers.
///
/// Observers are held weakly; an observer that was dropped is skipped and
/// forgotten. Cloning the hub yields another handle to the same observer list.
#[derive(Clone, Default)]
pub struct NativeEventHub {
    observers: Arc<Observers>,
}

impl NativeEventHub {
    /// Create a hub with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, observer: Weak<dyn NativeWindowObserver>) -> Subscription {
        let id = self.observers.lock().insert(observer);
        tracing::trace!(target: targets::WINDOW, ?id, "native observer subscribed");
        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    /// Remove a registration by ID.
    ///
    /// # Errors
    ///
    /// Fails with [`CoreError::InvalidConnection`] if `id` is not registered.
    pub fn try_unsubscribe(&self, id: SubscriptionId) -> CoreResult<()> {
        match self.observers.lock().remove(id) {
            Some(_) => Ok(()),
            None => Err(CoreError::InvalidConnection),
        }
    }

    /// Number of registrations, live or not yet pruned.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// Deliver `event` to every live observer in registration order.
    ///
    /// Returns [`CloseResponse::Veto`] if any observer vetoed. No lock is held
    /// while observers run, so they may subscribe or unsubscribe.
    pub fn dispatch(&self, event: NativeWindowEvent) -> CloseResponse {
        let _span = tracing::debug_span!(span_names::NATIVE_EVENT, ?event).entered();

        let observers: Vec<(SubscriptionId, Weak<dyn NativeWindowObserver>)> = self
            .observers
            .lock()
            .iter()
            .map(|(id, observer)| (id, observer.clone()))
            .collect();

        let mut response = CloseResponse::Continue;
        let mut dead = Vec::new();
        for (id, observer) in observers {
            match observer.upgrade() {
                Some(observer) => {
                    if observer.on_native_event(event).is_veto() {
                        response = CloseResponse::Veto;
                    }
                }
                None => dead.push(id),
            }
        }

        if !dead.is_empty() {
            let mut observers = self.observers.lock();
            for id in dead {
                observers.remove(id);
            }
        }
        response
    }
}

impl fmt::Debug for NativeEventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEventHub")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Keeps an observer registered; dropping it unsubscribes.
pub struct Subscription {
    id: SubscriptionId,
    observers: Weak<Observers>,
}

impl Subscription {
    /// The registration ID.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribe now.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.lock().remove(self.id);
            tracing::trace!(target: targets::WINDOW, id = ?self.id, "native observer unsubscribed");
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

static_assertions::assert_impl_all!(NativeEventHub: Send, Sync);
static_assertions::assert_impl_all!(Subscription: Send, Sync);
