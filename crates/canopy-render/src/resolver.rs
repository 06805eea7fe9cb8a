//! Brush to paint resolution.
//!
//! Solid colors resolve the same way for every region. Gradients and image
//! brushes are laid out relative to the destination region, so their shader is
//! rebuilt on every call.

use std::sync::atomic::{AtomicU64, Ordering};

use canopy_core::logging::targets;

use crate::brush::{
    Brush, BrushMappingMode, GradientProperties, ImageBrush, LinearGradientBrush,
    RadialGradientBrush, Stretch,
};
use crate::error::{RenderError, RenderResult};
use crate::paint::{NativePaint, PaintTarget, Shader};
use crate::transform::Transform2D;
use crate::types::{Color, Point, Rect};

/// Counters describing resolver activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Paints resolved for fills.
    pub fill_paints: u64,
    /// Paints resolved for strokes.
    pub stroke_paints: u64,
    /// Shaders built for gradient or image brushes.
    pub shaders_built: u64,
    /// Gradients that fell back to their fallback color.
    pub fallbacks: u64,
}

impl ResolverStats {
    /// Total paints resolved.
    pub fn total_paints(&self) -> u64 {
        self.fill_paints + self.stroke_paints
    }
}

/// Converts brushes into [`NativePaint`]s for a destination region.
///
/// Stateless apart from its counters; share it freely between threads.
#[derive(Debug, Default)]
pub struct PaintResolver {
    fill_paints: AtomicU64,
    stroke_paints: AtomicU64,
    shaders_built: AtomicU64,
    fallbacks: AtomicU64,
}

impl PaintResolver {
    /// Create a new resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a fresh fill paint for `brush` drawn into `region`.
    pub fn resolve_fill_paint(&self, brush: &Brush, region: Rect) -> RenderResult<NativePaint> {
        let mut paint = NativePaint::new();
        self.apply_to_fill_paint(brush, region, &mut paint)?;
        Ok(paint)
    }

    /// Resolve a fresh stroke paint for `brush` drawn into `region`.
    pub fn resolve_stroke_paint(&self, brush: &Brush, region: Rect) -> RenderResult<NativePaint> {
        let mut paint = NativePaint::new();
        self.apply_to_stroke_paint(brush, region, &mut paint)?;
        Ok(paint)
    }

    /// Reset `paint` for filling, then apply `brush` to it.
    pub fn apply_to_fill_paint(
        &self,
        brush: &Brush,
        region: Rect,
        paint: &mut NativePaint,
    ) -> RenderResult<()> {
        self.fill_paints.fetch_add(1, Ordering::Relaxed);
        self.apply(PaintTarget::Fill, brush, region, paint)
    }

    /// Reset `paint` for stroking, then apply `brush` to it.
    pub fn apply_to_stroke_paint(
        &self,
        brush: &Brush,
        region: Rect,
        paint: &mut NativePaint,
    ) -> RenderResult<()> {
        self.stroke_paints.fetch_add(1, Ordering::Relaxed);
        self.apply(PaintTarget::Stroke, brush, region, paint)
    }

    /// Snapshot of the resolver's counters.
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            fill_paints: self.fill_paints.load(Ordering::Relaxed),
            stroke_paints: self.stroke_paints.load(Ordering::Relaxed),
            shaders_built: self.shaders_built.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset_stats(&self) {
        self.fill_paints.store(0, Ordering::Relaxed);
        self.stroke_paints.store(0, Ordering::Relaxed);
        self.shaders_built.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
    }

    #[tracing::instrument(
        skip_all,
        target = "canopy_render",
        level = "trace",
        fields(kind = %brush.kind(), paint_target = ?target)
    )]
    fn apply(
        &self,
        target: PaintTarget,
        brush: &Brush,
        region: Rect,
        paint: &mut NativePaint,
    ) -> RenderResult<()> {
        paint.reset_for(target);

        match brush {
            Brush::Unset => {
                tracing::trace!(target: targets::RENDER, "unset brush has no paint");
                Err(RenderError::UnsupportedBrush { kind: brush.kind() })
            }
            Brush::SolidColor(solid) => {
                paint.color = solid.color_with_opacity();
                Ok(())
            }
            Brush::LinearGradient(linear) => {
                self.apply_linear(linear, region, paint);
                Ok(())
            }
            Brush::RadialGradient(radial) => {
                self.apply_radial(radial, region, paint);
                Ok(())
            }
            Brush::Image(image) => {
                self.apply_image(image, region, paint);
                Ok(())
            }
        }
    }

    /// Handle the cases shared by all gradients where no shader is needed.
    ///
    /// Returns `true` if `paint` was fully resolved to a flat color.
    fn apply_flat_gradient(
        &self,
        gradient: &GradientProperties,
        region: Rect,
        paint: &mut NativePaint,
    ) -> bool {
        if gradient.stops.is_empty() || region.is_empty() {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                target: targets::RENDER,
                stops = gradient.stops.len(),
                ?region,
                "gradient cannot be realized, using fallback color"
            );
            paint.color = gradient.fallback_with_opacity();
            return true;
        }
        if let [only] = gradient.stops.as_slice() {
            paint.color = only.color.with_opacity(gradient.opacity);
            return true;
        }
        false
    }

    fn apply_linear(&self, brush: &LinearGradientBrush, region: Rect, paint: &mut NativePaint) {
        let gradient = &brush.gradient;
        if self.apply_flat_gradient(gradient, region, paint) {
            return;
        }

        let start = map_point(gradient.mapping_mode, region, brush.start);
        let end = map_point(gradient.mapping_mode, region, brush.end);
        if start == end {
            // Zero-length axis: the last stop covers everything.
            let last = gradient.sorted_stops().last().map(|stop| stop.color);
            paint.color = last
                .unwrap_or(gradient.fallback_color)
                .with_opacity(gradient.opacity);
            return;
        }

        self.shaders_built.fetch_add(1, Ordering::Relaxed);
        paint.color = Color::WHITE.with_opacity(gradient.opacity);
        paint.shader = Some(Shader::Linear {
            start,
            end,
            stops: gradient.sorted_stops(),
            spread: gradient.spread,
        });
    }

    fn apply_radial(&self, brush: &RadialGradientBrush, region: Rect, paint: &mut NativePaint) {
        let gradient = &brush.gradient;
        if self.apply_flat_gradient(gradient, region, paint) {
            return;
        }

        let center = map_point(gradient.mapping_mode, region, brush.center);
        let (radius_x, radius_y) = match gradient.mapping_mode {
            BrushMappingMode::RelativeToBoundingBox => {
                (brush.radius_x * region.width(), brush.radius_y * region.height())
            }
            BrushMappingMode::Absolute => (brush.radius_x, brush.radius_y),
        };
        if radius_x <= 0.0 || radius_y <= 0.0 {
            self.fallbacks.fetch_add(1, Ordering::Relaxed);
            paint.color = gradient.fallback_with_opacity();
            return;
        }

        self.shaders_built.fetch_add(1, Ordering::Relaxed);
        paint.color = Color::WHITE.with_opacity(gradient.opacity);
        paint.shader = Some(Shader::Radial {
            center,
            radius: radius_x,
            stops: gradient.sorted_stops(),
            spread: gradient.spread,
            local_matrix: Transform2D::scale_around(1.0, radius_y / radius_x, center),
        });
    }

    fn apply_image(&self, brush: &ImageBrush, region: Rect, paint: &mut NativePaint) {
        let Some(source) = brush.source.as_ref() else {
            tracing::trace!(target: targets::RENDER, "image source not loaded");
            paint.color = Color::TRANSPARENT;
            return;
        };

        let (image_width, image_height) = source.dimensions();
        if image_width == 0 || image_height == 0 || region.is_empty() {
            paint.color = Color::TRANSPARENT;
            return;
        }

        self.shaders_built.fetch_add(1, Ordering::Relaxed);
        paint.color = Color::WHITE.with_opacity(brush.opacity);
        paint.shader = Some(Shader::Image {
            image: source.clone(),
            local_matrix: stretch_matrix(
                brush.stretch,
                image_width as f32,
                image_height as f32,
                region,
            ),
        });
    }
}

static_assertions::assert_impl_all!(PaintResolver: Send, Sync);

fn map_point(mode: BrushMappingMode, region: Rect, point: Point) -> Point {
    match mode {
        BrushMappingMode::RelativeToBoundingBox => region.point_at(point),
        BrushMappingMode::Absolute => Point::new(region.left() + point.x, region.top() + point.y),
    }
}

/// Matrix placing an image of the given size into `region`, centered.
pub(crate) fn stretch_matrix(
    stretch: Stretch,
    image_width: f32,
    image_height: f32,
    region: Rect,
) -> Transform2D {
    let fit_x = region.width() / image_width;
    let fit_y = region.height() / image_height;
    let (scale_x, scale_y) = match stretch {
        Stretch::None => (1.0, 1.0),
        Stretch::Fill => (fit_x, fit_y),
        Stretch::Uniform => {
            let s = fit_x.min(fit_y);
            (s, s)
        }
        Stretch::UniformToFill => {
            let s = fit_x.max(fit_y);
            (s, s)
        }
    };

    let placed_width = image_width * scale_x;
    let placed_height = image_height * scale_y;
    let offset_x = region.left() + (region.width() - placed_width) / 2.0;
    let offset_y = region.top() + (region.height() - placed_height) / 2.0;

    Transform2D::translate(offset_x, offset_y).then(&Transform2D::scale_xy(scale_x, scale_y))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::RgbaImage;

    use super::*;
    use crate::brush::{GradientStop, SolidColorBrush};
    use crate::paint::PaintStyle;

    fn two_stops() -> Vec<GradientStop> {
        vec![
            GradientStop::new(0.0, Color::RED),
            GradientStop::new(1.0, Color::BLUE),
        ]
    }

    #[test]
    fn test_solid_color_is_region_independent() {
        let resolver = PaintResolver::new();
        let brush = Brush::SolidColor(SolidColorBrush::new(Color::GREEN).with_opacity(0.5));

        let a = resolver
            .resolve_fill_paint(&brush, Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        let b = resolver
            .resolve_fill_paint(&brush, Rect::new(50.0, 50.0, 300.0, 1.0))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.color, Color::new(0.0, 0.5, 0.0, 0.5));
        assert!(a.shader.is_none());
    }

    #[test]
    fn test_unset_is_unsupported() {
        let resolver = PaintResolver::new();
        let err = resolver
            .resolve_stroke_paint(&Brush::Unset, Rect::new(0.0, 0.0, 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedBrush { .. }));
    }

    #[test]
    fn test_apply_resets_style_first() {
        let resolver = PaintResolver::new();
        let mut paint = NativePaint::new();
        resolver
            .apply_to_stroke_paint(&Brush::solid(Color::RED), Rect::ZERO, &mut paint)
            .unwrap();
        assert_eq!(paint.style, PaintStyle::Stroke);

        resolver
            .apply_to_fill_paint(
                &Brush::LinearGradient(LinearGradientBrush::horizontal(two_stops())),
                Rect::new(0.0, 0.0, 100.0, 20.0),
                &mut paint,
            )
            .unwrap();
        assert_eq!(paint.style, PaintStyle::Fill);
        assert!(paint.shader.is_some());

        resolver
            .apply_to_fill_paint(&Brush::solid(Color::RED), Rect::ZERO, &mut paint)
            .unwrap();
        assert!(paint.shader.is_none(), "previous shader must be cleared");
    }

    #[test]
    fn test_linear_gradient_follows_region() {
        let resolver = PaintResolver::new();
        let brush = Brush::LinearGradient(LinearGradientBrush::horizontal(two_stops()));

        let paint = resolver
            .resolve_fill_paint(&brush, Rect::new(10.0, 0.0, 100.0, 20.0))
            .unwrap();
        match paint.shader {
            Some(Shader::Linear { start, end, .. }) => {
                assert_eq!(start, Point::new(10.0, 10.0));
                assert_eq!(end, Point::new(110.0, 10.0));
            }
            other => panic!("expected linear shader, got {other:?}"),
        }

        let paint = resolver
            .resolve_fill_paint(&brush, Rect::new(0.0, 0.0, 50.0, 50.0))
            .unwrap();
        match paint.shader {
            Some(Shader::Linear { end, .. }) => assert_eq!(end, Point::new(50.0, 25.0)),
            other => panic!("expected linear shader, got {other:?}"),
        }
        assert_eq!(resolver.stats().shaders_built, 2);
    }

    #[test]
    fn test_absolute_mapping_offsets_by_region_origin() {
        let resolver = PaintResolver::new();
        let brush = Brush::LinearGradient(
            LinearGradientBrush::new(Point::new(0.0, 0.0), Point::new(30.0, 0.0), two_stops())
                .with_mapping_mode(BrushMappingMode::Absolute),
        );
        let paint = resolver
            .resolve_fill_paint(&brush, Rect::new(5.0, 5.0, 100.0, 100.0))
            .unwrap();
        match paint.shader {
            Some(Shader::Linear { start, end, .. }) => {
                assert_eq!(start, Point::new(5.0, 5.0));
                assert_eq!(end, Point::new(35.0, 5.0));
            }
            other => panic!("expected linear shader, got {other:?}"),
        }
    }

    #[test]
    fn test_gradient_fallbacks() {
        let resolver = PaintResolver::new();

        let empty = Brush::LinearGradient(
            LinearGradientBrush::horizontal(vec![]).with_fallback_color(Color::GREEN),
        );
        let paint = resolver
            .resolve_fill_paint(&empty, Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(paint.color, Color::GREEN);
        assert!(paint.shader.is_none());

        let degenerate = Brush::RadialGradient(
            RadialGradientBrush::new(two_stops()).with_fallback_color(Color::BLUE),
        );
        let paint = resolver.resolve_fill_paint(&degenerate, Rect::ZERO).unwrap();
        assert_eq!(paint.color, Color::BLUE);

        assert_eq!(resolver.stats().fallbacks, 2);
        assert_eq!(resolver.stats().shaders_built, 0);
    }

    #[test]
    fn test_single_stop_is_flat() {
        let resolver = PaintResolver::new();
        let brush = Brush::LinearGradient(
            LinearGradientBrush::horizontal(vec![GradientStop::new(0.3, Color::RED)])
                .with_opacity(0.5),
        );
        let paint = resolver
            .resolve_fill_paint(&brush, Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        assert_eq!(paint.color, Color::new(0.5, 0.0, 0.0, 0.5));
        assert!(paint.shader.is_none());
    }

    #[test]
    fn test_radial_gradient_ellipse() {
        let resolver = PaintResolver::new();
        let brush = Brush::RadialGradient(RadialGradientBrush::new(two_stops()));
        let paint = resolver
            .resolve_fill_paint(&brush, Rect::new(0.0, 0.0, 200.0, 100.0))
            .unwrap();
        match paint.shader {
            Some(Shader::Radial {
                center,
                radius,
                local_matrix,
                ..
            }) => {
                assert_eq!(center, Point::new(100.0, 50.0));
                assert_eq!(radius, 100.0);
                // The circle's bottom edge lands on the region's bottom edge.
                let edge = local_matrix.transform_point(Point::new(100.0, 150.0));
                assert!((edge.y - 100.0).abs() < 1e-3);
            }
            other => panic!("expected radial shader, got {other:?}"),
        }
    }

    #[test]
    fn test_image_without_source_is_transparent() {
        let resolver = PaintResolver::new();
        let paint = resolver
            .resolve_fill_paint(
                &Brush::Image(ImageBrush::unloaded()),
                Rect::new(0.0, 0.0, 10.0, 10.0),
            )
            .unwrap();
        assert!(paint.is_invisible());
        assert!(paint.shader.is_none());
    }

    #[test]
    fn test_image_uniform_stretch_is_centered() {
        let resolver = PaintResolver::new();
        let image = Arc::new(RgbaImage::new(10, 20));
        let brush = Brush::Image(ImageBrush::new(image).with_stretch(Stretch::Uniform));
        let paint = resolver
            .resolve_fill_paint(&brush, Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        match paint.shader {
            Some(Shader::Image { local_matrix, .. }) => {
                assert_eq!(local_matrix.scale_factors(), (5.0, 5.0));
                assert_eq!(local_matrix.translation(), (25.0, 0.0));
            }
            other => panic!("expected image shader, got {other:?}"),
        }
    }

    #[test]
    fn test_stats_count_paints() {
        let resolver = PaintResolver::new();
        let region = Rect::new(0.0, 0.0, 1.0, 1.0);
        let _ = resolver.resolve_fill_paint(&Brush::solid(Color::RED), region);
        let _ = resolver.resolve_stroke_paint(&Brush::solid(Color::RED), region);
        let _ = resolver.resolve_stroke_paint(&Brush::Unset, region);

        let stats = resolver.stats();
        assert_eq!(stats.fill_paints, 1);
        assert_eq!(stats.stroke_paints, 2);
        assert_eq!(stats.total_paints(), 3);

        resolver.reset_stats();
        assert_eq!(resolver.stats(), ResolverStats::default());
    }
}
