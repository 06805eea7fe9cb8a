//! Paint resolution for Canopy.
//!
//! This crate turns declarative [`Brush`]es into the concrete objects a native
//! 2D canvas draws with:
//!
//! - [`PaintResolver`] resolves a brush into a [`NativePaint`] for a
//!   destination region (flat color or gradient/image [`Shader`]).
//! - [`DrawableFactory`] builds background [`Drawable`]s, optionally masked by
//!   a [`Path`] and clipped to a rectangle.
//! - [`Canvas`] is the drawing capability hosts implement; [`RecordingCanvas`]
//!   records operations instead of drawing them.
//!
//! # Example
//!
//! ```
//! use canopy_render::{Brush, Color, Drawable, DrawableFactory, Rect};
//!
//! let factory = DrawableFactory::new();
//! let drawable = factory
//!     .build_background_drawable(
//!         &Brush::solid(Color::RED),
//!         Rect::new(0.0, 0.0, 10.0, 10.0),
//!         None,
//!         None,
//!         true,
//!     )
//!     .unwrap();
//! assert_eq!(drawable, Some(Drawable::Color(Color::RED)));
//! ```

mod brush;
mod canvas;
mod drawable;
mod error;
mod factory;
mod paint;
mod resolver;
mod transform;
mod types;

pub use brush::{
    Brush, BrushKind, BrushMappingMode, GradientProperties, GradientSpread, GradientStop,
    ImageBrush, LinearGradientBrush, RadialGradientBrush, SolidColorBrush, Stretch,
};
pub use canvas::{Canvas, DrawOp, RecordedOp, RecordingCanvas};
pub use drawable::Drawable;
pub use error::{RenderError, RenderResult};
pub use factory::DrawableFactory;
pub use paint::{NativePaint, PaintStyle, PaintTarget, Shader};
pub use resolver::{PaintResolver, ResolverStats};
pub use transform::Transform2D;
pub use types::{Color, CornerRadii, Path, PathCommand, Point, Rect, Size};
