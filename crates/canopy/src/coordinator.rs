//! Registry of content roots.
//!
//! The [`ContentRootCoordinator`] owns one [`ContentRoot`] per live native host.
//! It is shared by every host of an application and safe to use from any
//! thread.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use canopy_core::Signal;
use canopy_core::logging::targets;
use canopy_render::Color;

use crate::content_root::{ContentRoot, ContentRootType, HostHandle};
use crate::error::{HostError, HostResult};

/// Creates, tracks and releases content roots.
///
/// # Example
///
/// ```
/// use canopy::{ContentRootCoordinator, ContentRootType, HostHandle};
/// use canopy_render::Color;
///
/// let coordinator = ContentRootCoordinator::new();
/// let host = HostHandle::new(7);
/// let root = coordinator
///     .create_content_root(ContentRootType::PrimaryWindow, Color::WHITE, host)
///     .unwrap();
/// assert_eq!(root.host(), host);
///
/// // A host gets exactly one root.
/// assert!(
///     coordinator
///         .create_content_root(ContentRootType::PrimaryWindow, Color::WHITE, host)
///         .is_err()
/// );
/// ```
pub struct ContentRootCoordinator {
    roots: RwLock<HashMap<HostHandle, Arc<ContentRoot>>>,
    /// Order of creation, used to pick the primary root deterministically.
    creation_order: RwLock<Vec<HostHandle>>,
    root_created: Signal<HostHandle>,
    root_released: Signal<HostHandle>,
}

impl Default for ContentRootCoordinator {
    fn default() -> Self {
        Self {
            roots: RwLock::new(HashMap::new()),
            creation_order: RwLock::new(Vec::new()),
            root_created: Signal::new(),
            root_released: Signal::new(),
        }
    }
}

impl ContentRootCoordinator {
    /// Create an empty coordinator.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create the content root for `host`.
    ///
    /// # Errors
    ///
    /// Fails with [`HostError::DuplicateRoot`] if `host` already has a root.
    /// The check and the insertion happen under one write lock, so concurrent
    /// callers for the same host see exactly one success.
    pub fn create_content_root(
        &self,
        host_type: ContentRootType,
        background: Color,
        host: HostHandle,
    ) -> HostResult<Arc<ContentRoot>> {
        let root = {
            let mut roots = self.roots.write();
            match roots.entry(host) {
                Entry::Occupied(_) => {
                    tracing::warn!(
                        target: targets::CONTENT_ROOT,
                        %host,
                        %host_type,
                        "content root already exists"
                    );
                    return Err(HostError::DuplicateRoot { host });
                }
                Entry::Vacant(slot) => {
                    let root = Arc::new(ContentRoot::new(host_type, background, host));
                    slot.insert(root.clone());
                    self.creation_order.write().push(host);
                    root
                }
            }
        };

        tracing::debug!(target: targets::CONTENT_ROOT, %host, %host_type, "content root created");
        self.root_created.emit(host);
        Ok(root)
    }

    /// Look up the root of `host`.
    pub fn get(&self, host: HostHandle) -> Option<Arc<ContentRoot>> {
        self.roots.read().get(&host).cloned()
    }

    /// Check whether `host` has a root.
    pub fn contains(&self, host: HostHandle) -> bool {
        self.roots.read().contains_key(&host)
    }

    /// Number of live roots.
    pub fn count(&self) -> usize {
        self.roots.read().len()
    }

    /// Check whether no roots are registered.
    pub fn is_empty(&self) -> bool {
        self.roots.read().is_empty()
    }

    /// Hosts with a root, in creation order.
    pub fn hosts(&self) -> Vec<HostHandle> {
        self.creation_order.read().clone()
    }

    /// All roots of one type, in creation order.
    pub fn roots_of_type(&self, host_type: ContentRootType) -> Vec<Arc<ContentRoot>> {
        // Same lock order as creation: roots, then creation order.
        let roots = self.roots.read();
        let order = self.creation_order.read();
        order
            .iter()
            .filter_map(|host| roots.get(host))
            .filter(|root| root.host_type() == host_type)
            .cloned()
            .collect()
    }

    /// The earliest created primary window root still alive.
    pub fn primary_root(&self) -> Option<Arc<ContentRoot>> {
        self.roots_of_type(ContentRootType::PrimaryWindow)
            .into_iter()
            .next()
    }

    /// Drop the registry's reference to the root of `host`.
    ///
    /// Returns the released root, or `None` if `host` had none.
    pub fn release(&self, host: HostHandle) -> Option<Arc<ContentRoot>> {
        self.release_if(host, |_| true)
    }

    /// Release `root` only if it is still the one registered for its host.
    ///
    /// A host that outlives its root's registration (the root was released
    /// and a new one created for the same handle) leaves the newer root alone.
    pub fn release_root(&self, root: &Arc<ContentRoot>) -> bool {
        self.release_if(root.host(), |current| Arc::ptr_eq(current, root))
            .is_some()
    }

    fn release_if(
        &self,
        host: HostHandle,
        matches: impl Fn(&Arc<ContentRoot>) -> bool,
    ) -> Option<Arc<ContentRoot>> {
        let released = {
            let mut roots = self.roots.write();
            match roots.entry(host) {
                Entry::Occupied(entry) if matches(entry.get()) => {
                    self.creation_order.write().retain(|h| *h != host);
                    Some(entry.remove())
                }
                _ => None,
            }
        };

        if released.is_some() {
            tracing::debug!(target: targets::CONTENT_ROOT, %host, "content root released");
            self.root_released.emit(host);
        }
        released
    }

    /// Signal emitted after a root is created.
    pub fn root_created(&self) -> &Signal<HostHandle> {
        &self.root_created
    }

    /// Signal emitted after a root is released.
    pub fn root_released(&self) -> &Signal<HostHandle> {
        &self.root_released
    }
}

impl fmt::Debug for ContentRootCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRootCoordinator")
            .field("hosts", &self.hosts())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ContentRootCoordinator: Send, Sync);

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_duplicate_root_fails() {
        let coordinator = ContentRootCoordinator::new();
        let host = HostHandle::new(1);
        coordinator
            .create_content_root(ContentRootType::PrimaryWindow, Color::WHITE, host)
            .unwrap();
        let err = coordinator
            .create_content_root(ContentRootType::Popup, Color::TRANSPARENT, host)
            .unwrap_err();
        assert!(matches!(err, HostError::DuplicateRoot { host: h } if h == host));
        assert_eq!(coordinator.count(), 1);
    }

    #[test]
    fn test_release_allows_recreation() {
        let coordinator = ContentRootCoordinator::new();
        let host = HostHandle::new(9);
        coordinator
            .create_content_root(ContentRootType::EmbeddedIsland, Color::TRANSPARENT, host)
            .unwrap();

        assert!(coordinator.release(host).is_some());
        assert!(coordinator.release(host).is_none());
        assert!(coordinator.is_empty());

        coordinator
            .create_content_root(ContentRootType::EmbeddedIsland, Color::TRANSPARENT, host)
            .unwrap();
        assert!(coordinator.contains(host));
    }

    #[test]
    fn test_release_root_ignores_replaced_root() {
        let coordinator = ContentRootCoordinator::new();
        let host = HostHandle::new(4);
        let stale = coordinator
            .create_content_root(ContentRootType::PrimaryWindow, Color::WHITE, host)
            .unwrap();
        coordinator.release(host);
        let current = coordinator
            .create_content_root(ContentRootType::PrimaryWindow, Color::WHITE, host)
            .unwrap();

        assert!(!coordinator.release_root(&stale));
        assert!(Arc::ptr_eq(&coordinator.get(host).unwrap(), &current));

        assert!(coordinator.release_root(&current));
        assert!(!coordinator.contains(host));
        assert!(coordinator.hosts().is_empty());
    }

    #[test]
    fn test_primary_root_is_earliest() {
        let coordinator = ContentRootCoordinator::new();
        for (raw, host_type) in [
            (5, ContentRootType::Popup),
            (3, ContentRootType::PrimaryWindow),
            (1, ContentRootType::PrimaryWindow),
        ] {
            coordinator
                .create_content_root(host_type, Color::WHITE, HostHandle::new(raw))
                .unwrap();
        }

        assert_eq!(coordinator.primary_root().unwrap().host(), HostHandle::new(3));
        assert_eq!(coordinator.roots_of_type(ContentRootType::PrimaryWindow).len(), 2);
        assert_eq!(
            coordinator.hosts(),
            vec![HostHandle::new(5), HostHandle::new(3), HostHandle::new(1)]
        );

        coordinator.release(HostHandle::new(3));
        assert_eq!(coordinator.primary_root().unwrap().host(), HostHandle::new(1));
    }

    #[test]
    fn test_signals_fire_outside_lock() {
        let coordinator = ContentRootCoordinator::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let c = coordinator.clone();
        let s = seen.clone();
        coordinator.root_created().connect(move |host| {
            // Re-entering the registry must not deadlock.
            s.lock().push(("created", *host, c.contains(*host)));
        });
        let c = coordinator.clone();
        let s = seen.clone();
        coordinator.root_released().connect(move |host| {
            s.lock().push(("released", *host, c.contains(*host)));
        });

        let host = HostHandle::new(2);
        coordinator
            .create_content_root(ContentRootType::Popup, Color::TRANSPARENT, host)
            .unwrap();
        coordinator.release(host);

        assert_eq!(
            *seen.lock(),
            vec![("created", host, true), ("released", host, false)]
        );
    }
}
