//! Window configuration and builder.

use winit::dpi::{LogicalSize, Size as WinitSize};
use winit::window::{Window, WindowAttributes};

use canopy_render::{Color, Size};

use crate::content_root::ContentRootType;

/// Resolution scale used when none is configured, in percent.
pub const DEFAULT_RESOLUTION_SCALE: u32 = 100;

/// Configuration for hosting content in a native window.
///
/// # Example
///
/// ```
/// use canopy::WindowConfig;
/// use canopy_render::Size;
///
/// let config = WindowConfig::new("Gallery")
///     .with_preferred_launch_size(Size::new(1280.0, 720.0))
///     .with_resolution_scale(150);
/// assert_eq!(config.resolution_scale(), 150);
/// ```
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Title used when the package has no display name.
    title: String,
    host_type: ContentRootType,
    /// Background override; the host type's default otherwise.
    background: Option<Color>,
    /// Initial size in logical pixels.
    preferred_launch_size: Option<Size>,
    /// Display scale in percent, used to pick scaled assets.
    resolution_scale: u32,
    anti_alias: bool,
    /// Whether the native window is visible before the content is shown.
    visible_on_create: bool,
}

impl WindowConfig {
    /// Create a configuration for a primary window.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            host_type: ContentRootType::PrimaryWindow,
            background: None,
            preferred_launch_size: None,
            resolution_scale: DEFAULT_RESOLUTION_SCALE,
            anti_alias: true,
            visible_on_create: false,
        }
    }

    pub fn with_host_type(mut self, host_type: ContentRootType) -> Self {
        self.host_type = host_type;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Set the size requested from the native window at construction.
    ///
    /// Empty sizes are ignored.
    pub fn with_preferred_launch_size(mut self, size: Size) -> Self {
        self.preferred_launch_size = (!size.is_empty()).then_some(size);
        self
    }

    /// Set the display scale in percent (100 = 1x).
    pub fn with_resolution_scale(mut self, scale: u32) -> Self {
        self.resolution_scale = scale.max(1);
        self
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn with_visible_on_create(mut self, visible: bool) -> Self {
        self.visible_on_create = visible;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn host_type(&self) -> ContentRootType {
        self.host_type
    }

    /// The effective background color.
    pub fn background(&self) -> Color {
        self.background
            .unwrap_or_else(|| self.host_type.default_background())
    }

    pub fn preferred_launch_size(&self) -> Option<Size> {
        self.preferred_launch_size
    }

    pub fn resolution_scale(&self) -> u32 {
        self.resolution_scale
    }

    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    /// Convert to winit `WindowAttributes`.
    ///
    /// Windows start hidden unless configured otherwise; the adapter shows
    /// them once the content is shown.
    pub fn to_window_attributes(&self) -> WindowAttributes {
        let mut attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_visible(self.visible_on_create)
            .with_transparent(!self.background().is_opaque());

        if let Some(size) = self.preferred_launch_size {
            attrs = attrs.with_inner_size(WinitSize::Logical(LogicalSize::new(
                size.width as f64,
                size.height as f64,
            )));
        }
        attrs
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_defaults_by_host_type() {
        assert_eq!(WindowConfig::new("a").background(), Color::WHITE);
        assert_eq!(
            WindowConfig::new("a")
                .with_host_type(ContentRootType::Popup)
                .background(),
            Color::TRANSPARENT
        );
        assert_eq!(
            WindowConfig::new("a")
                .with_background(Color::BLACK)
                .background(),
            Color::BLACK
        );
    }

    #[test]
    fn test_empty_launch_size_is_ignored() {
        let config = WindowConfig::new("a").with_preferred_launch_size(Size::ZERO);
        assert_eq!(config.preferred_launch_size(), None);
    }

    #[test]
    fn test_window_attributes() {
        let attrs = WindowConfig::new("Title")
            .with_preferred_launch_size(Size::new(800.0, 600.0))
            .to_window_attributes();
        assert_eq!(attrs.title, "Title");
        assert!(!attrs.visible);
        assert!(attrs.inner_size.is_some());
    }
}
