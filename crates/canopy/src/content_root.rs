//! Content roots.
//!
//! A [`ContentRoot`] is the bridge between one native host (a window, an
//! embedded island, a popup) and the visual tree shown inside it. Roots are
//! created by the [`ContentRootCoordinator`](crate::ContentRootCoordinator),
//! one per host.

use std::fmt;

use parking_lot::{Mutex, RwLock};

use canopy_core::logging::{span_names, targets};
use canopy_core::{ActivationState, Signal, ThreadAffinity};
use canopy_render::{Canvas, Color, DrawableFactory, Path, Rect, Size};

use crate::error::{HostError, HostResult};
use crate::visual::{VisualRef, VisualTree};

/// The kind of host a content root belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentRootType {
    /// A top-level application window.
    PrimaryWindow,
    /// Content embedded into a foreign UI.
    EmbeddedIsland,
    /// A transient popup surface.
    Popup,
}

impl ContentRootType {
    /// Whether roots of this type must always have a root visual.
    pub fn requires_root_visual(self) -> bool {
        matches!(self, Self::PrimaryWindow)
    }

    /// Background used when the host does not configure one.
    pub fn default_background(self) -> Color {
        match self {
            Self::PrimaryWindow => Color::WHITE,
            Self::EmbeddedIsland | Self::Popup => Color::TRANSPARENT,
        }
    }
}

impl fmt::Display for ContentRootType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PrimaryWindow => "primary window",
            Self::EmbeddedIsland => "embedded island",
            Self::Popup => "popup",
        };
        f.write_str(name)
    }
}

/// Opaque identity of a live native host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostHandle(u64);

impl HostHandle {
    /// Wrap a raw native handle value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host#{:x}", self.0)
    }
}

impl From<winit::window::WindowId> for HostHandle {
    fn from(id: winit::window::WindowId) -> Self {
        Self(u64::from(id))
    }
}

/// The root of the visual content shown by one native host.
pub struct ContentRoot {
    host: HostHandle,
    host_type: ContentRootType,
    background: Mutex<Color>,
    tree: RwLock<VisualTree>,
    activation: Mutex<Option<ActivationState>>,
    size_changed: Signal<Size>,
    affinity: ThreadAffinity,
}

impl ContentRoot {
    pub(crate) fn new(host_type: ContentRootType, background: Color, host: HostHandle) -> Self {
        Self {
            host,
            host_type,
            background: Mutex::new(background),
            tree: RwLock::new(VisualTree::new()),
            activation: Mutex::new(None),
            size_changed: Signal::new(),
            affinity: ThreadAffinity::current(),
        }
    }

    /// The host this root belongs to.
    pub fn host(&self) -> HostHandle {
        self.host
    }

    /// The kind of host this root belongs to.
    pub fn host_type(&self) -> ContentRootType {
        self.host_type
    }

    pub fn background_color(&self) -> Color {
        *self.background.lock()
    }

    pub fn set_background_color(&self, color: Color) {
        *self.background.lock() = color;
    }

    /// Whether the host shows through this root's background.
    pub fn is_transparent(&self) -> bool {
        !self.background_color().is_opaque()
    }

    /// The current public root visual.
    pub fn root_visual(&self) -> Option<VisualRef> {
        self.tree.read().root_visual()
    }

    /// Replace the public root visual.
    ///
    /// Setting the visual already installed is a no-op.
    ///
    /// # Errors
    ///
    /// Primary window roots cannot be cleared; passing `None` for one fails
    /// with [`HostError::InvalidRoot`].
    pub fn set_public_root_visual(&self, visual: Option<VisualRef>) -> HostResult<()> {
        self.affinity
            .debug_assert_same_thread("ContentRoot::set_public_root_visual");

        if visual.is_none() && self.host_type.requires_root_visual() {
            return Err(HostError::InvalidRoot {
                host_type: self.host_type,
            });
        }

        let replaced = self.tree.write().set_root_visual(visual);
        tracing::debug!(
            target: targets::CONTENT_ROOT,
            host = %self.host,
            replaced,
            "public root visual set"
        );
        Ok(())
    }

    /// Measure the root visual. Zero without one.
    pub fn measure_override(&self, available: Size) -> Size {
        match self.root_visual() {
            Some(root) => root.measure(available),
            None => Size::ZERO,
        }
    }

    /// Arrange the root visual at `proposed` and publish the resulting size.
    ///
    /// Without a root visual the proposed size is published as is.
    pub fn arrange_override(&self, proposed: Size) -> Size {
        self.affinity
            .debug_assert_same_thread("ContentRoot::arrange_override");
        let _span = tracing::trace_span!(span_names::ARRANGE, host = %self.host).entered();

        // The visual runs outside the tree lock so it may query this root.
        let arranged = match self.root_visual() {
            Some(root) => root.arrange(proposed),
            None => proposed,
        };

        let previous = {
            let mut tree = self.tree.write();
            let previous = tree.size();
            tree.set_size(arranged);
            previous
        };

        if previous != arranged {
            tracing::trace!(
                target: targets::CONTENT_ROOT,
                host = %self.host,
                width = arranged.width,
                height = arranged.height,
                "published size changed"
            );
            self.size_changed.emit(arranged);
        }
        arranged
    }

    /// The size published by the last arrange.
    pub fn size(&self) -> Size {
        self.tree.read().size()
    }

    pub fn width(&self) -> f32 {
        self.size().width
    }

    pub fn height(&self) -> f32 {
        self.size().height
    }

    /// The activation state last reported by the host, if any.
    pub fn activation_state(&self) -> Option<ActivationState> {
        *self.activation.lock()
    }

    pub fn set_activation_state(&self, state: ActivationState) {
        *self.activation.lock() = Some(state);
    }

    /// Signal emitted when the published size changes.
    pub fn size_changed(&self) -> &Signal<Size> {
        &self.size_changed
    }

    /// Draw the root background and the root visual's background.
    ///
    /// Everything is clipped to the published bounds.
    ///
    /// # Errors
    ///
    /// Fails if the root visual's background cannot be built as a drawable.
    pub fn render(&self, factory: &DrawableFactory, canvas: &mut dyn Canvas) -> HostResult<()> {
        let _span = tracing::trace_span!(span_names::PAINT, host = %self.host).entered();
        let bounds = Rect::from_size(self.size());
        if bounds.is_empty() {
            return Ok(());
        }

        let background = self.background_color();
        if !background.is_transparent() {
            canvas.fill_rect(bounds, background);
        }

        let Some(root) = self.root_visual() else {
            return Ok(());
        };
        let radii = root.corner_radii();
        let mask = (!radii.is_zero()).then(|| Path::rounded_rect(bounds, radii));
        let drawable = factory.build_background_drawable(
            &root.background(),
            bounds,
            Some(bounds),
            mask.as_ref(),
            true,
        )?;
        if let Some(drawable) = drawable {
            drawable.draw(canvas, bounds);
        }
        Ok(())
    }
}

impl fmt::Debug for ContentRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRoot")
            .field("host", &self.host)
            .field("host_type", &self.host_type)
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ContentRoot: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use canopy_render::{CornerRadii, DrawOp, RecordingCanvas};

    use super::*;
    use crate::visual::Border;

    fn root(host_type: ContentRootType) -> ContentRoot {
        ContentRoot::new(host_type, host_type.default_background(), HostHandle::new(1))
    }

    #[test]
    fn test_primary_root_cannot_be_cleared() {
        let root = root(ContentRootType::PrimaryWindow);
        let err = root.set_public_root_visual(None).unwrap_err();
        assert!(matches!(
            err,
            HostError::InvalidRoot {
                host_type: ContentRootType::PrimaryWindow
            }
        ));
    }

    #[test]
    fn test_island_root_can_be_cleared() {
        let root = root(ContentRootType::EmbeddedIsland);
        root.set_public_root_visual(Some(Border::new(Size::ZERO).into_ref()))
            .unwrap();
        root.set_public_root_visual(None).unwrap();
        assert!(root.root_visual().is_none());
        assert!(root.is_transparent());
    }

    #[test]
    fn test_last_write_wins() {
        let root = root(ContentRootType::PrimaryWindow);
        let first = Border::new(Size::new(1.0, 1.0)).into_ref();
        let second = Border::new(Size::new(2.0, 2.0)).into_ref();
        root.set_public_root_visual(Some(first)).unwrap();
        root.set_public_root_visual(Some(second.clone())).unwrap();
        assert!(Arc::ptr_eq(&root.root_visual().unwrap(), &second));
    }

    #[test]
    fn test_arrange_publishes_size_once() {
        let root = root(ContentRootType::PrimaryWindow);
        root.set_public_root_visual(Some(Border::new(Size::ZERO).into_ref()))
            .unwrap();

        let changes = Arc::new(AtomicUsize::new(0));
        let changes_clone = changes.clone();
        root.size_changed().connect(move |_| {
            changes_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(root.arrange_override(Size::new(640.0, 480.0)), Size::new(640.0, 480.0));
        root.arrange_override(Size::new(640.0, 480.0));
        assert_eq!(changes.load(Ordering::SeqCst), 1);
        assert_eq!(root.width(), 640.0);
        assert_eq!(root.height(), 480.0);
    }

    #[test]
    fn test_measure_without_root_is_zero() {
        let root = root(ContentRootType::Popup);
        assert_eq!(root.measure_override(Size::new(10.0, 10.0)), Size::ZERO);
    }

    #[test]
    fn test_render_draws_background_and_masked_root() {
        let root = root(ContentRootType::PrimaryWindow);
        root.set_public_root_visual(Some(
            Border::new(Size::ZERO)
                .with_background(Color::BLUE)
                .with_corner_radii(CornerRadii::uniform(4.0))
                .into_ref(),
        ))
        .unwrap();
        root.arrange_override(Size::new(20.0, 10.0));

        let mut canvas = RecordingCanvas::new();
        root.render(&DrawableFactory::new(), &mut canvas).unwrap();

        let ops = canvas.ops();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0].op, DrawOp::FillRect { color, .. } if color == Color::WHITE));
        assert!(matches!(ops[1].op, DrawOp::DrawPath { .. }));
        assert_eq!(ops[1].clip, Some(Rect::new(0.0, 0.0, 20.0, 10.0)));
    }
}
