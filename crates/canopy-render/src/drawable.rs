//! Background drawables.
//!
//! A [`Drawable`] is a ready-to-draw background: everything brush specific has
//! been resolved, so drawing only replays canvas calls.

use crate::canvas::Canvas;
use crate::paint::NativePaint;
use crate::types::{Color, Path, Rect, Size};

/// A resolved background.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// A flat color filling the bounds it is drawn into.
    Color(Color),
    /// A paint (flat or shaded) filling the bounds it is drawn into.
    Paint(NativePaint),
    /// A paint filling a masking path.
    Shape {
        path: Path,
        paint: NativePaint,
        anti_alias: bool,
        size: Size,
    },
    /// Another drawable restricted to a clip rectangle.
    Clipped { clip: Rect, inner: Box<Drawable> },
}

impl Drawable {
    /// Wrap this drawable in a clip.
    pub fn clipped(self, clip: Rect) -> Self {
        Self::Clipped {
            clip,
            inner: Box::new(self),
        }
    }

    /// Draw into `bounds` on `canvas`.
    ///
    /// Shapes ignore `bounds` and draw their path as is.
    pub fn draw(&self, canvas: &mut dyn Canvas, bounds: Rect) {
        match self {
            Self::Color(color) => canvas.fill_rect(bounds, *color),
            Self::Paint(paint) => canvas.draw_rect(bounds, paint),
            Self::Shape {
                path,
                paint,
                anti_alias,
                ..
            } => {
                if paint.anti_alias == *anti_alias {
                    canvas.draw_path(path, paint);
                } else {
                    let paint = paint.clone().with_anti_alias(*anti_alias);
                    canvas.draw_path(path, &paint);
                }
            }
            Self::Clipped { clip, inner } => {
                canvas.save();
                canvas.clip_rect(*clip);
                inner.draw(canvas, bounds);
                canvas.restore();
            }
        }
    }

    /// The clip applied to this drawable, if any.
    pub fn clip(&self) -> Option<Rect> {
        match self {
            Self::Clipped { clip, .. } => Some(*clip),
            _ => None,
        }
    }

    /// The innermost drawable, with clips peeled off.
    pub fn content(&self) -> &Drawable {
        match self {
            Self::Clipped { inner, .. } => inner.content(),
            other => other,
        }
    }

    /// The natural size of the drawable, for shapes.
    pub fn intrinsic_size(&self) -> Option<Size> {
        match self {
            Self::Shape { size, .. } => Some(*size),
            Self::Clipped { inner, .. } => inner.intrinsic_size(),
            Self::Color(_) | Self::Paint(_) => None,
        }
    }
}
