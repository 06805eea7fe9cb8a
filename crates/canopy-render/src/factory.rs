//! Background drawable construction.

use std::sync::Arc;

use canopy_core::logging::targets;

use crate::brush::Brush;
use crate::drawable::Drawable;
use crate::error::{RenderError, RenderResult};
use crate::paint::NativePaint;
use crate::resolver::PaintResolver;
use crate::types::{Path, Rect};

/// Builds background [`Drawable`]s from brushes.
///
/// Fill paints are resolved through the shared [`PaintResolver`] and only when
/// the brush cannot be drawn as a flat color.
#[derive(Debug, Clone, Default)]
pub struct DrawableFactory {
    resolver: Arc<PaintResolver>,
}

impl DrawableFactory {
    /// Create a factory with its own resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory sharing an existing resolver.
    pub fn with_resolver(resolver: Arc<PaintResolver>) -> Self {
        Self { resolver }
    }

    /// The resolver used for fill paints.
    pub fn resolver(&self) -> &Arc<PaintResolver> {
        &self.resolver
    }

    /// Build the background drawable for `brush` over `draw_area`.
    ///
    /// A masking path takes precedence over the flat color shortcut, so masked
    /// solid colors still become [`Drawable::Shape`]. When `clip` is set the
    /// result is wrapped in [`Drawable::Clipped`].
    ///
    /// Returns `Ok(None)` when the brush has nothing to paint (an unset brush).
    ///
    /// # Errors
    ///
    /// Image brushes are rejected with [`RenderError::UnsupportedOperation`];
    /// they are drawn through the image pipeline instead.
    #[tracing::instrument(skip_all, target = "canopy_render", level = "trace", fields(kind = %brush.kind()))]
    pub fn build_background_drawable(
        &self,
        brush: &Brush,
        draw_area: Rect,
        clip: Option<Rect>,
        masking_path: Option<&Path>,
        anti_alias: bool,
    ) -> RenderResult<Option<Drawable>> {
        if matches!(brush, Brush::Image(_)) {
            return Err(RenderError::UnsupportedOperation(
                "image brushes cannot be built as background drawables".into(),
            ));
        }

        let Some(drawable) = self.build_unclipped(brush, draw_area, masking_path, anti_alias)?
        else {
            return Ok(None);
        };

        Ok(Some(match clip {
            Some(clip) => drawable.clipped(clip),
            None => drawable,
        }))
    }

    fn build_unclipped(
        &self,
        brush: &Brush,
        draw_area: Rect,
        masking_path: Option<&Path>,
        anti_alias: bool,
    ) -> RenderResult<Option<Drawable>> {
        match masking_path {
            None => {
                if let Some(color) = brush.flat_color() {
                    return Ok(Some(Drawable::Color(color)));
                }
                Ok(self.fill_paint(brush, draw_area)?.map(Drawable::Paint))
            }
            Some(path) => {
                let Some(paint) = self.fill_paint(brush, draw_area)? else {
                    return Ok(None);
                };
                Ok(Some(Drawable::Shape {
                    path: path.clone(),
                    paint: paint.with_anti_alias(anti_alias),
                    anti_alias,
                    size: draw_area.size,
                }))
            }
        }
    }

    /// Resolve the fill paint, mapping "no paint representation" to `None`.
    fn fill_paint(
        &self,
        brush: &Brush,
        draw_area: Rect,
    ) -> RenderResult<Option<NativePaint>> {
        match self.resolver.resolve_fill_paint(brush, draw_area) {
            Ok(paint) => Ok(Some(paint)),
            Err(RenderError::UnsupportedBrush { kind }) => {
                tracing::trace!(target: targets::RENDER, %kind, "no fill paint, no background");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
