//! Application package metadata.
//!
//! Windows take their title and icon from the application package. The
//! [`PackageMetadata`] capability abstracts where that information comes from;
//! [`PackageManifest`] reads it from a `Package.toml` file:
//!
//! ```toml
//! [package]
//! display-name = "Canopy Gallery"
//! logo = "Assets/StoreLogo.png"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use canopy_core::logging::targets;

use crate::error::{HostError, HostResult};

/// File name of a package manifest inside the installed directory.
pub const MANIFEST_FILE_NAME: &str = "Package.toml";

/// Read-only information about the installed application package.
pub trait PackageMetadata: Send + Sync {
    /// Directory the package is installed in.
    fn installed_path(&self) -> &Path;

    /// Logo reference, relative to the installed path or an `ms-appx:///` URI.
    fn logo(&self) -> Option<&str>;

    /// Human readable application name.
    fn display_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    package: ManifestPackage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ManifestPackage {
    display_name: String,
    #[serde(default)]
    logo: Option<String>,
}

/// Package metadata read from a TOML manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    display_name: String,
    logo: Option<String>,
    installed_path: PathBuf,
}

impl PackageManifest {
    /// Create metadata in code.
    pub fn new(display_name: impl Into<String>, installed_path: impl Into<PathBuf>) -> Self {
        Self {
            display_name: display_name.into(),
            logo: None,
            installed_path: installed_path.into(),
        }
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Parse manifest text for a package installed at `installed_path`.
    ///
    /// # Errors
    ///
    /// Fails with [`HostError::Manifest`] if the text is not a valid manifest.
    pub fn from_toml_str(text: &str, installed_path: impl Into<PathBuf>) -> HostResult<Self> {
        let file: ManifestFile =
            toml::from_str(text).map_err(|e| HostError::Manifest(e.to_string()))?;
        Ok(Self {
            display_name: file.package.display_name,
            logo: file.package.logo.filter(|logo| !logo.is_empty()),
            installed_path: installed_path.into(),
        })
    }

    /// Load `Package.toml` from an installed package directory.
    ///
    /// # Errors
    ///
    /// Fails with [`HostError::Manifest`] if the file cannot be read or parsed.
    pub fn load(installed_path: impl AsRef<Path>) -> HostResult<Self> {
        let installed_path = installed_path.as_ref();
        let manifest_path = installed_path.join(MANIFEST_FILE_NAME);
        let text = fs::read_to_string(&manifest_path)
            .map_err(|e| HostError::Manifest(format!("{}: {}", manifest_path.display(), e)))?;

        let manifest = Self::from_toml_str(&text, installed_path)?;
        tracing::debug!(
            target: targets::WINDOW,
            path = %manifest_path.display(),
            display_name = %manifest.display_name,
            "package manifest loaded"
        );
        Ok(manifest)
    }
}

impl PackageMetadata for PackageManifest {
    fn installed_path(&self) -> &Path {
        &self.installed_path
    }

    fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = PackageManifest::from_toml_str(
            r#"
            [package]
            display-name = "Gallery"
            logo = "Assets\\Logo.png"
            "#,
            "/opt/gallery",
        )
        .unwrap();

        assert_eq!(manifest.display_name(), "Gallery");
        assert_eq!(manifest.logo(), Some("Assets\\Logo.png"));
        assert_eq!(manifest.installed_path(), Path::new("/opt/gallery"));
    }

    #[test]
    fn test_logo_is_optional() {
        let manifest =
            PackageManifest::from_toml_str("[package]\ndisplay-name = \"App\"\nlogo = \"\"\n", "/")
                .unwrap();
        assert_eq!(manifest.logo(), None);
    }

    #[test]
    fn test_invalid_manifest() {
        let err = PackageManifest::from_toml_str("[package]\n", "/").unwrap_err();
        assert!(matches!(err, HostError::Manifest(_)));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            "[package]\ndisplay-name = \"Loaded\"\n",
        )
        .unwrap();

        let manifest = PackageManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.display_name(), "Loaded");
        assert_eq!(manifest.installed_path(), dir.path());
    }
}
