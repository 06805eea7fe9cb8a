//! 2D affine transforms for shader placement.
//!
//! Gradient and image shaders are defined in their own unit space and placed
//! onto a destination region with a local matrix.
//!
//! ```
//! use canopy_render::{Point, Transform2D};
//!
//! // First scale, then translate.
//! let t = Transform2D::translate(10.0, 0.0).then(&Transform2D::scale_xy(2.0, 2.0));
//! assert_eq!(t.transform_point(Point::new(5.0, 1.0)), Point::new(20.0, 2.0));
//! ```

use glam::{Affine2, Vec2};

use crate::types::Point;

/// A 2D affine transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D(Affine2);

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self(Affine2::IDENTITY);

    /// Create a translation transform.
    #[inline]
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self(Affine2::from_translation(Vec2::new(tx, ty)))
    }

    /// Create a non-uniform scaling transform.
    #[inline]
    pub fn scale_xy(sx: f32, sy: f32) -> Self {
        Self(Affine2::from_scale(Vec2::new(sx, sy)))
    }

    /// Scale around a fixed point.
    #[inline]
    pub fn scale_around(sx: f32, sy: f32, center: Point) -> Self {
        Self::translate(center.x, center.y)
            .then(&Self::scale_xy(sx, sy))
            .then(&Self::translate(-center.x, -center.y))
    }

    /// Concatenate: the result first applies `other`, then `self`.
    #[inline]
    pub fn then(&self, other: &Self) -> Self {
        Self(self.0 * other.0)
    }

    /// Transform a point.
    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::from_vec2(self.0.transform_point2(p.to_vec2()))
    }

    /// Get the translation component.
    #[inline]
    pub fn translation(&self) -> (f32, f32) {
        (self.0.translation.x, self.0.translation.y)
    }

    /// Get the scale factors along each axis (ignores rotation and skew).
    #[inline]
    pub fn scale_factors(&self) -> (f32, f32) {
        (self.0.matrix2.x_axis.x, self.0.matrix2.y_axis.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(Transform2D::IDENTITY.transform_point(p), p);
        assert_eq!(Transform2D::default(), Transform2D::IDENTITY);
    }

    #[test]
    fn test_scale_around_keeps_center_fixed() {
        let center = Point::new(50.0, 50.0);
        let t = Transform2D::scale_around(1.0, 0.5, center);
        assert_eq!(t.transform_point(center), center);
        assert_eq!(t.transform_point(Point::new(50.0, 100.0)), Point::new(50.0, 75.0));
    }
}
