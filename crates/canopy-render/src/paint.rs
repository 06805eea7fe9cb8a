//! Concrete paint objects handed to native drawing surfaces.
//!
//! A [`NativePaint`] is the resolved, region-specific form of a
//! [`Brush`](crate::Brush): a flat color plus an optional [`Shader`].

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

use crate::brush::{GradientSpread, GradientStop};
use crate::transform::Transform2D;
use crate::types::{Color, Point};

/// Whether a paint fills or strokes geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    #[default]
    Fill,
    Stroke,
}

/// The use a paint is being resolved for.
///
/// Selects the style a paint is reset to before a brush is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintTarget {
    Fill,
    Stroke,
}

impl PaintTarget {
    /// The paint style this target resets to.
    pub fn style(self) -> PaintStyle {
        match self {
            Self::Fill => PaintStyle::Fill,
            Self::Stroke => PaintStyle::Stroke,
        }
    }
}

/// A color source that varies across the painted area.
///
/// Geometry is in destination coordinates, already mapped through the
/// destination region.
#[derive(Clone, PartialEq)]
pub enum Shader {
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
        spread: GradientSpread,
    },
    /// A circle of `radius` around `center`, stretched into an ellipse by
    /// `local_matrix`.
    Radial {
        center: Point,
        radius: f32,
        stops: Vec<GradientStop>,
        spread: GradientSpread,
        local_matrix: Transform2D,
    },
    /// Image pixels placed by `local_matrix` (image space to destination).
    Image {
        image: Arc<RgbaImage>,
        local_matrix: Transform2D,
    },
}

impl Shader {
    /// The shader's gradient stops, empty for image shaders.
    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops,
            Self::Image { .. } => &[],
        }
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear {
                start,
                end,
                stops,
                spread,
            } => f
                .debug_struct("Linear")
                .field("start", start)
                .field("end", end)
                .field("stops", stops)
                .field("spread", spread)
                .finish(),
            Self::Radial {
                center,
                radius,
                stops,
                spread,
                local_matrix,
            } => f
                .debug_struct("Radial")
                .field("center", center)
                .field("radius", radius)
                .field("stops", stops)
                .field("spread", spread)
                .field("local_matrix", local_matrix)
                .finish(),
            Self::Image {
                image,
                local_matrix,
            } => f
                .debug_struct("Image")
                .field("dimensions", &image.dimensions())
                .field("local_matrix", local_matrix)
                .finish(),
        }
    }
}

/// A resolved paint.
///
/// When a shader is set, `color` only contributes its alpha, which modulates
/// the shader output.
#[derive(Debug, Clone, PartialEq)]
pub struct NativePaint {
    pub style: PaintStyle,
    pub color: Color,
    pub shader: Option<Shader>,
    pub anti_alias: bool,
    pub stroke_width: f32,
}

impl Default for NativePaint {
    fn default() -> Self {
        Self {
            style: PaintStyle::Fill,
            color: Color::BLACK,
            shader: None,
            anti_alias: true,
            stroke_width: 1.0,
        }
    }
}

impl NativePaint {
    /// Create a default fill paint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paint already reset for `target`.
    pub fn for_target(target: PaintTarget) -> Self {
        let mut paint = Self::new();
        paint.reset_for(target);
        paint
    }

    /// Reset color and shader state and switch to `target`'s style.
    ///
    /// Stroke width and anti-aliasing belong to the caller and are kept.
    pub fn reset_for(&mut self, target: PaintTarget) {
        self.style = target.style();
        self.color = Color::BLACK;
        self.shader = None;
    }

    /// Reset for use as a fill.
    pub fn reset_for_fill(&mut self) {
        self.reset_for(PaintTarget::Fill);
    }

    /// Reset for use as a stroke.
    pub fn reset_for_stroke(&mut self) {
        self.reset_for(PaintTarget::Stroke);
    }

    /// Whether this paint draws a single flat color.
    pub fn is_flat(&self) -> bool {
        self.shader.is_none()
    }

    /// Whether drawing with this paint leaves the destination unchanged.
    pub fn is_invisible(&self) -> bool {
        self.color.is_transparent()
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_caller_owned_fields() {
        let mut paint = NativePaint::new()
            .with_anti_alias(false)
            .with_stroke_width(3.0);
        paint.color = Color::RED;
        paint.shader = Some(Shader::Linear {
            start: Point::ZERO,
            end: Point::new(1.0, 0.0),
            stops: vec![],
            spread: GradientSpread::Pad,
        });

        paint.reset_for_stroke();

        assert_eq!(paint.style, PaintStyle::Stroke);
        assert_eq!(paint.color, Color::BLACK);
        assert!(paint.shader.is_none());
        assert!(!paint.anti_alias);
        assert_eq!(paint.stroke_width, 3.0);
    }

    #[test]
    fn test_for_target() {
        assert_eq!(NativePaint::for_target(PaintTarget::Stroke).style, PaintStyle::Stroke);
        assert!(NativePaint::for_target(PaintTarget::Fill).is_flat());
    }
}
