//! Window icon resolution and loading.
//!
//! The package logo is a reference relative to the installed package
//! directory. When the file itself is missing, a scaled variant
//! `<stem>.scale-<N><ext>` next to it is used instead, preferring the largest
//! scale not above the display's resolution scale.

use std::ffi::OsString;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use url::Url;

use canopy_core::logging::targets;

use crate::error::{HostError, HostResult};
use crate::window::config::DEFAULT_RESOLUTION_SCALE;

/// Asset scales searched for scaled variants, in percent.
pub const KNOWN_SCALES: [u32; 6] = [100, 125, 150, 200, 300, 400];

/// URI scheme for references into the installed package.
pub const PACKAGE_URI_SCHEME: &str = "ms-appx";

/// An icon file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    /// Full path of the icon file.
    pub path: PathBuf,
    /// The scale of the variant used, `None` for the unscaled file.
    pub scale: Option<u32>,
}

impl ResolvedIcon {
    /// Whether a scaled variant was used.
    pub fn is_scaled(&self) -> bool {
        self.scale.is_some()
    }
}

/// Locates the icon file for a package logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconResolver {
    resolution_scale: u32,
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION_SCALE)
    }
}

impl IconResolver {
    /// Create a resolver for a display scale in percent.
    pub fn new(resolution_scale: u32) -> Self {
        Self { resolution_scale }
    }

    pub fn resolution_scale(&self) -> u32 {
        self.resolution_scale
    }

    /// Find the icon file for `logo` inside `installed_path`.
    ///
    /// Returns `Ok(None)` (and logs a warning) when neither the file nor any
    /// scaled variant exists. Identical inputs and filesystem state always
    /// give the same answer.
    ///
    /// # Errors
    ///
    /// Fails with [`HostError::MalformedUri`] if `logo` cannot be interpreted.
    pub fn resolve(&self, logo: &str, installed_path: &Path) -> HostResult<Option<ResolvedIcon>> {
        let relative = normalize_logo_reference(logo)?;
        let primary = installed_path.join(&relative);

        if primary.is_file() {
            tracing::info!(target: targets::ICON, path = %primary.display(), "loading icon from package logo");
            return Ok(Some(ResolvedIcon {
                path: primary,
                scale: None,
            }));
        }

        for (scale, candidate) in self.scaled_candidates(&primary) {
            if candidate.is_file() {
                tracing::info!(
                    target: targets::ICON,
                    path = %candidate.display(),
                    scale,
                    "loading scaled icon from package logo"
                );
                return Ok(Some(ResolvedIcon {
                    path: candidate,
                    scale: Some(scale),
                }));
            }
        }

        tracing::warn!(
            target: targets::ICON,
            path = %primary.display(),
            "unable to find icon file specified by the package"
        );
        Ok(None)
    }

    /// Scaled variants of `path`, in probing order.
    ///
    /// Starts at the largest known scale not above the resolution scale and
    /// walks down. Displays below 100% still try the 100% variant.
    pub fn scaled_candidates(&self, path: &Path) -> Vec<(u32, PathBuf)> {
        let Some(stem) = path.file_stem() else {
            return Vec::new();
        };

        let mut scales: Vec<u32> = KNOWN_SCALES
            .iter()
            .copied()
            .filter(|scale| *scale <= self.resolution_scale)
            .rev()
            .collect();
        if scales.is_empty() {
            scales.push(KNOWN_SCALES[0]);
        }

        scales
            .into_iter()
            .map(|scale| {
                let mut name = OsString::from(stem);
                name.push(format!(".scale-{scale}"));
                if let Some(ext) = path.extension() {
                    name.push(".");
                    name.push(ext);
                }
                (scale, path.with_file_name(name))
            })
            .collect()
    }
}

/// Turn a logo reference into a path relative to the installed package.
///
/// Accepts relative paths using either separator and `ms-appx:///` URIs.
///
/// # Errors
///
/// Rejects empty references, references containing NUL, other URI schemes,
/// unparsable URIs and references escaping the package directory with
/// [`HostError::MalformedUri`].
pub fn normalize_logo_reference(logo: &str) -> HostResult<PathBuf> {
    let malformed = |reason: &str| HostError::MalformedUri {
        uri: logo.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = logo.trim();
    if trimmed.is_empty() {
        return Err(malformed("empty reference"));
    }
    if trimmed.contains('\0') {
        return Err(malformed("contains NUL"));
    }

    let raw_path = match trimmed.split_once("://") {
        Some((_, rest)) => {
            let url = Url::parse(trimmed).map_err(|e| malformed(&e.to_string()))?;
            if url.scheme() != PACKAGE_URI_SCHEME {
                return Err(malformed(&format!("unsupported scheme `{}`", url.scheme())));
            }
            // Take the path from the original text; `Url::path` is
            // percent-encoded and file names may contain spaces.
            let path = rest.find('/').map_or("", |start| &rest[start..]);
            path.split(['?', '#']).next().unwrap_or_default().to_string()
        }
        None => trimmed.to_string(),
    };

    let mut relative = PathBuf::new();
    for part in raw_path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => return Err(malformed("escapes the package directory")),
            part => {
                // A drive prefix or root would make the join absolute.
                if Path::new(part)
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)))
                {
                    return Err(malformed("absolute paths are not allowed"));
                }
                relative.push(part);
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(malformed("no file name"));
    }
    Ok(relative)
}

/// A decoded window icon.
#[derive(Clone, PartialEq, Eq)]
pub struct WindowIcon {
    /// RGBA pixel data (4 bytes per pixel, row-major).
    rgba: Vec<u8>,
    width: u32,
    height: u32,
}

impl WindowIcon {
    /// Create an icon from raw RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Fails if either dimension is zero or the data length does not match.
    pub fn from_rgba(rgba: Vec<u8>, width: u32, height: u32) -> HostResult<Self> {
        if width == 0 || height == 0 {
            return Err(HostError::IconLoad(
                "width and height must be non-zero".into(),
            ));
        }

        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(HostError::IconLoad(format!(
                "expected {expected} bytes, got {}",
                rgba.len()
            )));
        }

        Ok(Self {
            rgba,
            width,
            height,
        })
    }

    /// Decode an icon file.
    ///
    /// # Errors
    ///
    /// Fails with [`HostError::IconLoad`] if the file cannot be read or decoded.
    pub fn load(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| HostError::IconLoad(format!("{}: {}", path.display(), e)))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(image.into_raw(), width, height)
    }

    /// Decode an icon from in-memory image file data.
    pub fn from_memory(data: &[u8]) -> HostResult<Self> {
        let image = image::load_from_memory(data)
            .map_err(|e| HostError::IconLoad(format!("failed to decode image: {e}")))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(image.into_raw(), width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub(crate) fn to_winit_icon(&self) -> HostResult<winit::window::Icon> {
        winit::window::Icon::from_rgba(self.rgba.clone(), self.width, self.height)
            .map_err(|e| HostError::IconLoad(format!("winit icon error: {e}")))
    }
}

impl fmt::Debug for WindowIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowIcon")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.rgba.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators_and_uri() {
        let expected: PathBuf = ["Assets", "Logo.png"].iter().collect();
        assert_eq!(normalize_logo_reference("Assets\\Logo.png").unwrap(), expected);
        assert_eq!(normalize_logo_reference("Assets/Logo.png").unwrap(), expected);
        assert_eq!(
            normalize_logo_reference("ms-appx:///Assets/Logo.png").unwrap(),
            expected
        );
    }

    #[test]
    fn test_normalize_rejects_malformed() {
        for bad in [
            "",
            "   ",
            "Assets/\0.png",
            "https://example.com/logo.png",
            "ms-appx://[bad/logo.png",
            "../outside.png",
            "ms-appx:///",
        ] {
            let err = normalize_logo_reference(bad).unwrap_err();
            assert!(
                matches!(err, HostError::MalformedUri { .. }),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_scaled_candidates_order() {
        let resolver = IconResolver::new(175);
        let names: Vec<String> = resolver
            .scaled_candidates(Path::new("/pkg/Assets/Logo.png"))
            .into_iter()
            .map(|(_, p)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["Logo.scale-150.png", "Logo.scale-125.png", "Logo.scale-100.png"]
        );
    }

    #[test]
    fn test_scaled_candidates_below_100() {
        let resolver = IconResolver::new(50);
        let candidates = resolver.scaled_candidates(Path::new("Logo"));
        assert_eq!(candidates, vec![(100, PathBuf::from("Logo.scale-100"))]);
    }

    #[test]
    fn test_icon_from_rgba() {
        let icon = WindowIcon::from_rgba(vec![255; 16], 2, 2).unwrap();
        assert_eq!((icon.width(), icon.height()), (2, 2));
        assert!(WindowIcon::from_rgba(vec![], 0, 2).is_err());
        assert!(WindowIcon::from_rgba(vec![0; 8], 2, 2).is_err());
        assert!(format!("{icon:?}").contains("data_len: 16"));
    }
}
