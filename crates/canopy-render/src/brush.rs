//! Declarative brush descriptions.
//!
//! A [`Brush`] says *how* a region should be painted without knowing where the
//! region is. [`PaintResolver`](crate::PaintResolver) turns it into a concrete
//! [`NativePaint`](crate::NativePaint) once a destination is known.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

use crate::types::{Color, Point};

/// The kind of a brush, used in diagnostics and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrushKind {
    Unset,
    SolidColor,
    LinearGradient,
    RadialGradient,
    Image,
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unset => "Unset",
            Self::SolidColor => "SolidColorBrush",
            Self::LinearGradient => "LinearGradientBrush",
            Self::RadialGradient => "RadialGradientBrush",
            Self::Image => "ImageBrush",
        };
        f.write_str(name)
    }
}

/// A declarative paint description.
///
/// Brushes are immutable; cloning is cheap (image data is shared).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Brush {
    /// No brush. Has no paint representation.
    #[default]
    Unset,
    SolidColor(SolidColorBrush),
    LinearGradient(LinearGradientBrush),
    RadialGradient(RadialGradientBrush),
    Image(ImageBrush),
}

impl Brush {
    /// Shorthand for an opaque solid color brush.
    pub fn solid(color: Color) -> Self {
        Self::SolidColor(SolidColorBrush::new(color))
    }

    /// The brush's kind.
    pub fn kind(&self) -> BrushKind {
        match self {
            Self::Unset => BrushKind::Unset,
            Self::SolidColor(_) => BrushKind::SolidColor,
            Self::LinearGradient(_) => BrushKind::LinearGradient,
            Self::RadialGradient(_) => BrushKind::RadialGradient,
            Self::Image(_) => BrushKind::Image,
        }
    }

    /// The brush's flat color with opacity applied, if it paints a single
    /// color that does not depend on the destination region.
    pub fn flat_color(&self) -> Option<Color> {
        match self {
            Self::SolidColor(brush) => Some(brush.color_with_opacity()),
            _ => None,
        }
    }

    /// Whether the resolved paint depends on the destination region.
    pub fn is_region_dependent(&self) -> bool {
        matches!(
            self,
            Self::LinearGradient(_) | Self::RadialGradient(_) | Self::Image(_)
        )
    }

    /// Whether this is [`Brush::Unset`].
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Self::solid(color)
    }
}

/// A single flat color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColorBrush {
    pub color: Color,
    pub opacity: f32,
}

impl SolidColorBrush {
    /// Create a fully opaque-opacity brush.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }

    /// Set the brush opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// The color with the brush opacity applied.
    pub fn color_with_opacity(&self) -> Color {
        self.color.with_opacity(self.opacity)
    }
}

/// A gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0).
    pub offset: f32,
    /// Color at this stop.
    pub color: Color,
}

impl GradientStop {
    /// Create a new gradient stop.
    #[inline]
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Coordinate space of gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushMappingMode {
    /// Points are fractions of the destination region (0..1).
    #[default]
    RelativeToBoundingBox,
    /// Points are offsets in the destination's coordinate space.
    Absolute,
}

/// How a gradient continues past its end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientSpread {
    /// Extend the edge colors.
    #[default]
    Pad,
    /// Restart the gradient.
    Repeat,
    /// Mirror the gradient.
    Reflect,
}

/// Properties shared by all gradient brushes.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientProperties {
    pub stops: Vec<GradientStop>,
    pub mapping_mode: BrushMappingMode,
    pub spread: GradientSpread,
    pub opacity: f32,
    /// Painted when the gradient cannot be realized (no stops, empty region).
    pub fallback_color: Color,
}

impl Default for GradientProperties {
    fn default() -> Self {
        Self {
            stops: Vec::new(),
            mapping_mode: BrushMappingMode::default(),
            spread: GradientSpread::default(),
            opacity: 1.0,
            fallback_color: Color::TRANSPARENT,
        }
    }
}

impl GradientProperties {
    /// Stops sorted by offset, clamped to 0..1.
    pub fn sorted_stops(&self) -> Vec<GradientStop> {
        let mut stops: Vec<GradientStop> = self
            .stops
            .iter()
            .map(|s| GradientStop::new(s.offset.clamp(0.0, 1.0), s.color))
            .collect();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        stops
    }

    /// The fallback color with opacity applied.
    pub fn fallback_with_opacity(&self) -> Color {
        self.fallback_color.with_opacity(self.opacity)
    }
}

/// A gradient along a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradientBrush {
    pub start: Point,
    pub end: Point,
    pub gradient: GradientProperties,
}

impl LinearGradientBrush {
    /// Create a relative-mapped gradient from `start` to `end`.
    pub fn new(start: Point, end: Point, stops: Vec<GradientStop>) -> Self {
        Self {
            start,
            end,
            gradient: GradientProperties {
                stops,
                ..Default::default()
            },
        }
    }

    /// Left-to-right horizontal gradient across the region.
    pub fn horizontal(stops: Vec<GradientStop>) -> Self {
        Self::new(Point::new(0.0, 0.5), Point::new(1.0, 0.5), stops)
    }

    pub fn with_mapping_mode(mut self, mode: BrushMappingMode) -> Self {
        self.gradient.mapping_mode = mode;
        self
    }

    pub fn with_spread(mut self, spread: GradientSpread) -> Self {
        self.gradient.spread = spread;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.gradient.opacity = opacity;
        self
    }

    pub fn with_fallback_color(mut self, color: Color) -> Self {
        self.gradient.fallback_color = color;
        self
    }
}

/// An elliptical gradient radiating from a center.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradientBrush {
    pub center: Point,
    pub radius_x: f32,
    pub radius_y: f32,
    pub gradient: GradientProperties,
}

impl RadialGradientBrush {
    /// Create a relative-mapped gradient centered in the region that reaches
    /// its edges.
    pub fn new(stops: Vec<GradientStop>) -> Self {
        Self {
            center: Point::new(0.5, 0.5),
            radius_x: 0.5,
            radius_y: 0.5,
            gradient: GradientProperties {
                stops,
                ..Default::default()
            },
        }
    }

    pub fn with_center(mut self, center: Point) -> Self {
        self.center = center;
        self
    }

    pub fn with_radii(mut self, radius_x: f32, radius_y: f32) -> Self {
        self.radius_x = radius_x;
        self.radius_y = radius_y;
        self
    }

    pub fn with_mapping_mode(mut self, mode: BrushMappingMode) -> Self {
        self.gradient.mapping_mode = mode;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.gradient.opacity = opacity;
        self
    }

    pub fn with_fallback_color(mut self, color: Color) -> Self {
        self.gradient.fallback_color = color;
        self
    }
}

/// How image content is fitted into the destination region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stretch {
    /// Natural size, centered.
    None,
    /// Fill the region, ignoring aspect ratio.
    #[default]
    Fill,
    /// Fit inside the region, preserving aspect ratio.
    Uniform,
    /// Cover the region, preserving aspect ratio.
    UniformToFill,
}

/// A brush painting decoded image content.
#[derive(Clone, PartialEq)]
pub struct ImageBrush {
    /// Decoded RGBA pixels, or `None` while the source is not loaded.
    pub source: Option<Arc<RgbaImage>>,
    pub stretch: Stretch,
    pub opacity: f32,
}

impl ImageBrush {
    /// Create a brush over decoded image content.
    pub fn new(source: Arc<RgbaImage>) -> Self {
        Self {
            source: Some(source),
            stretch: Stretch::default(),
            opacity: 1.0,
        }
    }

    /// A brush whose source has not been loaded yet.
    pub fn unloaded() -> Self {
        Self {
            source: None,
            stretch: Stretch::default(),
            opacity: 1.0,
        }
    }

    pub fn with_stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl fmt::Debug for ImageBrush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBrush")
            .field("source", &self.source.as_ref().map(|img| img.dimensions()))
            .field("stretch", &self.stretch)
            .field("opacity", &self.opacity)
            .finish()
    }
}
