//! The drawing surface capability.
//!
//! [`Canvas`] is the small slice of a native 2D canvas that drawables need.
//! Hosts implement it over their platform surface; [`RecordingCanvas`] keeps
//! the issued operations for inspection.

use crate::paint::NativePaint;
use crate::types::{Color, Path, Rect};

/// A native 2D drawing surface.
pub trait Canvas {
    /// Push the current clip state.
    fn save(&mut self);

    /// Pop the clip state pushed by the matching [`save`](Canvas::save).
    fn restore(&mut self);

    /// Intersect the current clip with `rect`.
    fn clip_rect(&mut self, rect: Rect);

    /// Fill `rect` with a flat color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `rect` with a resolved paint.
    fn draw_rect(&mut self, rect: Rect, paint: &NativePaint);

    /// Draw `path` with a resolved paint.
    fn draw_path(&mut self, path: &Path, paint: &NativePaint);
}

/// A drawing operation captured by [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Color },
    DrawRect { rect: Rect, paint: NativePaint },
    DrawPath { path: Path, paint: NativePaint },
}

impl DrawOp {
    /// Area the operation touches before clipping.
    pub fn extent(&self) -> Option<Rect> {
        match self {
            Self::FillRect { rect, .. } | Self::DrawRect { rect, .. } => Some(*rect),
            Self::DrawPath { path, .. } => path.bounds(),
        }
    }
}

/// A recorded operation together with the clip active when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedOp {
    pub op: DrawOp,
    /// `None` means unclipped.
    pub clip: Option<Rect>,
}

impl RecordedOp {
    /// The area this operation can actually change: its extent intersected
    /// with its clip.
    pub fn painted_region(&self) -> Option<Rect> {
        let extent = self.op.extent()?;
        match self.clip {
            Some(clip) => extent.intersect(&clip),
            None if extent.is_empty() => None,
            None => Some(extent),
        }
    }
}

/// A canvas that records operations instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<RecordedOp>,
    clip: Option<Rect>,
    saved: Vec<Option<Rect>>,
}

impl RecordingCanvas {
    /// Create an empty, unclipped recording canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations in issue order.
    pub fn ops(&self) -> &[RecordedOp] {
        &self.ops
    }

    /// The currently active clip, `None` when unclipped.
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Number of unmatched [`save`](Canvas::save) calls.
    pub fn save_depth(&self) -> usize {
        self.saved.len()
    }

    /// Regions actually painted by each operation, skipping fully clipped ones.
    pub fn painted_regions(&self) -> Vec<Rect> {
        self.ops.iter().filter_map(RecordedOp::painted_region).collect()
    }

    /// Drop every recorded operation and reset the clip state.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.clip = None;
        self.saved.clear();
    }

    fn record(&mut self, op: DrawOp) {
        self.ops.push(RecordedOp {
            op,
            clip: self.clip,
        });
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.saved.push(self.clip);
    }

    fn restore(&mut self) {
        // Unbalanced restores are ignored, like most native canvases do.
        if let Some(clip) = self.saved.pop() {
            self.clip = clip;
        }
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.clip = Some(match self.clip {
            Some(current) => current.intersect(&rect).unwrap_or(Rect::ZERO),
            None => rect,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawOp::FillRect { rect, color });
    }

    fn draw_rect(&mut self, rect: Rect, paint: &NativePaint) {
        self.record(DrawOp::DrawRect {
            rect,
            paint: paint.clone(),
        });
    }

    fn draw_path(&mut self, path: &Path, paint: &NativePaint) {
        self.record(DrawOp::DrawPath {
            path: path.clone(),
            paint: paint.clone(),
        });
    }
}
