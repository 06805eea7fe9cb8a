//! Visuals and the per-root visual tree.
//!
//! The hosting layer only needs three things from a visual: how big it wants
//! to be, how big it ended up, and what its background looks like. Layout and
//! input live elsewhere.

use std::fmt;
use std::sync::Arc;

use canopy_render::{Brush, CornerRadii, Size};

/// A node that can be placed at the root of a [`VisualTree`].
pub trait Visual: Send + Sync + fmt::Debug {
    /// Desired size given the space available.
    fn measure(&self, available: Size) -> Size;

    /// Final size given the space granted by the host.
    fn arrange(&self, final_size: Size) -> Size;

    /// The visual's background brush.
    fn background(&self) -> Brush {
        Brush::Unset
    }

    /// Corner radii masking the background.
    fn corner_radii(&self) -> CornerRadii {
        CornerRadii::ZERO
    }
}

/// Shared handle to a visual.
pub type VisualRef = Arc<dyn Visual>;

/// A rectangular visual with a background, used as a root element.
///
/// It wants `desired` (clamped to the available space) and accepts whatever
/// size it is arranged at.
#[derive(Debug, Clone)]
pub struct Border {
    desired: Size,
    background: Brush,
    corner_radii: CornerRadii,
}

impl Border {
    /// Create a border wanting `desired` with no background.
    pub fn new(desired: Size) -> Self {
        Self {
            desired,
            background: Brush::Unset,
            corner_radii: CornerRadii::ZERO,
        }
    }

    pub fn with_background(mut self, background: impl Into<Brush>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_corner_radii(mut self, radii: CornerRadii) -> Self {
        self.corner_radii = radii;
        self
    }

    /// Wrap in a shareable [`VisualRef`].
    pub fn into_ref(self) -> VisualRef {
        Arc::new(self)
    }
}

impl Visual for Border {
    fn measure(&self, available: Size) -> Size {
        Size::new(
            self.desired.width.min(available.width),
            self.desired.height.min(available.height),
        )
    }

    fn arrange(&self, final_size: Size) -> Size {
        final_size
    }

    fn background(&self) -> Brush {
        self.background.clone()
    }

    fn corner_radii(&self) -> CornerRadii {
        self.corner_radii
    }
}

/// The visual tree owned by a content root.
///
/// Holds at most one root visual; setting a new one replaces the old.
#[derive(Debug, Default)]
pub struct VisualTree {
    root: Option<VisualRef>,
    size: Size,
}

impl VisualTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current root visual.
    pub fn root_visual(&self) -> Option<VisualRef> {
        self.root.clone()
    }

    /// Replace the root visual.
    ///
    /// Returns `false` if `root` is the visual already installed.
    pub fn set_root_visual(&mut self, root: Option<VisualRef>) -> bool {
        let unchanged = match (&self.root, &root) {
            (Some(current), Some(new)) => {
                std::ptr::addr_eq(Arc::as_ptr(current), Arc::as_ptr(new))
            }
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return false;
        }
        self.root = root;
        true
    }

    /// The size last arranged.
    pub fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_render::Color;

    #[test]
    fn test_border_measure_clamps() {
        let border = Border::new(Size::new(100.0, 50.0));
        assert_eq!(border.measure(Size::new(80.0, 80.0)), Size::new(80.0, 50.0));
        assert_eq!(border.arrange(Size::new(10.0, 10.0)), Size::new(10.0, 10.0));
    }

    #[test]
    fn test_set_same_root_is_noop() {
        let mut tree = VisualTree::new();
        let root = Border::new(Size::ZERO).with_background(Color::RED).into_ref();

        assert!(tree.set_root_visual(Some(root.clone())));
        assert!(!tree.set_root_visual(Some(root.clone())));

        let other = Border::new(Size::ZERO).into_ref();
        assert!(tree.set_root_visual(Some(other.clone())));
        assert!(Arc::ptr_eq(&tree.root_visual().unwrap(), &other));

        assert!(tree.set_root_visual(None));
        assert!(!tree.set_root_visual(None));
    }
}
