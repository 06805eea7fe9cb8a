//! Embedded island hosts.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use canopy_core::logging::targets;
use canopy_render::{Color, Size};

use crate::content_root::{ContentRoot, ContentRootType, HostHandle};
use crate::coordinator::ContentRootCoordinator;
use crate::error::HostResult;
use crate::visual::VisualRef;

/// Hosts content embedded into a foreign UI.
///
/// The island owns a transparent [`ContentRootType::EmbeddedIsland`] root for
/// as long as it lives; closing or dropping the island releases it.
pub struct IslandHost {
    root: Arc<ContentRoot>,
    coordinator: Arc<ContentRootCoordinator>,
    size: Mutex<Size>,
    closed: AtomicBool,
}

impl IslandHost {
    /// Create an island for `host`.
    ///
    /// # Errors
    ///
    /// Fails if `host` already has a content root.
    pub fn new(coordinator: Arc<ContentRootCoordinator>, host: HostHandle) -> HostResult<Self> {
        let root = coordinator.create_content_root(
            ContentRootType::EmbeddedIsland,
            Color::TRANSPARENT,
            host,
        )?;
        Ok(Self {
            root,
            coordinator,
            size: Mutex::new(Size::ZERO),
            closed: AtomicBool::new(false),
        })
    }

    /// The island's content root.
    pub fn content_root(&self) -> &Arc<ContentRoot> {
        &self.root
    }

    /// Replace the content shown by the island. `None` clears it.
    pub fn set_public_root_visual(&self, visual: Option<VisualRef>) -> HostResult<()> {
        self.root.set_public_root_visual(visual)
    }

    /// Arrange the island's content and take its final size as the island's
    /// own size.
    pub fn arrange_override(&self, final_size: Size) -> Size {
        let arranged = self.root.arrange_override(final_size);
        *self.size.lock() = arranged;
        arranged
    }

    pub fn size(&self) -> Size {
        *self.size.lock()
    }

    pub fn width(&self) -> f32 {
        self.size().width
    }

    pub fn height(&self) -> f32 {
        self.size().height
    }

    /// Release the island's content root. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!(target: targets::CONTENT_ROOT, host = %self.root.host(), "island closed");
        self.coordinator.release_root(&self.root);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for IslandHost {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for IslandHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IslandHost")
            .field("host", &self.root.host())
            .field("size", &self.size())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::Border;

    #[test]
    fn test_island_root_is_transparent() {
        let coordinator = ContentRootCoordinator::new();
        let island = IslandHost::new(coordinator.clone(), HostHandle::new(11)).unwrap();
        let root = island.content_root();
        assert_eq!(root.host_type(), ContentRootType::EmbeddedIsland);
        assert!(root.is_transparent());
        assert!(coordinator.contains(HostHandle::new(11)));
    }

    #[test]
    fn test_arrange_mirrors_size() {
        let coordinator = ContentRootCoordinator::new();
        let island = IslandHost::new(coordinator, HostHandle::new(12)).unwrap();
        island
            .set_public_root_visual(Some(Border::new(Size::new(5.0, 5.0)).into_ref()))
            .unwrap();

        let arranged = island.arrange_override(Size::new(300.0, 200.0));
        assert_eq!(arranged, Size::new(300.0, 200.0));
        assert_eq!(island.width(), 300.0);
        assert_eq!(island.height(), 200.0);
        assert_eq!(island.content_root().size(), arranged);
    }

    #[test]
    fn test_drop_releases_root() {
        let coordinator = ContentRootCoordinator::new();
        let host = HostHandle::new(13);
        {
            let island = IslandHost::new(coordinator.clone(), host).unwrap();
            island.set_public_root_visual(None).unwrap();
        }
        assert!(!coordinator.contains(host));
    }

    #[test]
    fn test_late_close_keeps_replacement_root() {
        let coordinator = ContentRootCoordinator::new();
        let host = HostHandle::new(14);
        let island = IslandHost::new(coordinator.clone(), host).unwrap();

        coordinator.release(host);
        let replacement = IslandHost::new(coordinator.clone(), host).unwrap();
        drop(island);

        assert!(coordinator.contains(host));
        assert!(Arc::ptr_eq(
            &coordinator.get(host).unwrap(),
            replacement.content_root()
        ));
    }
}
