//! Package manifest.
//!
//! An optional `dts.json` next to a package's entry point declares which
//! requests, besides plain execution, the entry point answers. The shell
//! never runs an entry point for completion or help unless its manifest
//! says it understands that request.
//!
//! ```json
//! {
//!     "description": "Build the workspace",
//!     "complete": true,
//!     "describe": false
//! }
//! ```

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::ResolveError;

/// Manifest file name inside a package directory.
pub const MANIFEST_FILE: &str = "dts.json";

/// Capabilities declared by a command package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageManifest {
    /// Static help text, shown without running the entry point.
    #[serde(default)]
    pub description: Option<String>,

    /// Entry point answers `DTS_COMPLETE=1` requests.
    #[serde(default)]
    pub complete: bool,

    /// Entry point answers `DTS_DESCRIBE=1` requests.
    #[serde(default)]
    pub describe: bool,
}

impl PackageManifest {
    /// Read the manifest of the package at `package_dir`.
    ///
    /// A package without a manifest declares nothing beyond execution.
    pub fn load(package_dir: &Path) -> Result<Self, ResolveError> {
        let path = package_dir.join(MANIFEST_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ResolveError::InvalidManifest {
                    path,
                    message: e.to_string(),
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| ResolveError::InvalidManifest {
            path,
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_manifest_declares_nothing() {
        let temp = TempDir::new().unwrap();

        let manifest = PackageManifest::load(temp.path()).unwrap();

        assert_eq!(manifest, PackageManifest::default());
        assert!(!manifest.complete);
        assert!(!manifest.describe);
    }

    #[test]
    fn parses_declared_capabilities() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(MANIFEST_FILE),
            r#"{"description": "Build things", "complete": true}"#,
        )
        .unwrap();

        let manifest = PackageManifest::load(temp.path()).unwrap();

        assert_eq!(manifest.description.as_deref(), Some("Build things"));
        assert!(manifest.complete);
        assert!(!manifest.describe);
    }

    #[test]
    fn malformed_manifest_is_resolve_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MANIFEST_FILE), r#"{"complete": "yes"}"#).unwrap();

        let err = PackageManifest::load(temp.path()).unwrap_err();

        assert!(matches!(err, ResolveError::InvalidManifest { .. }));
        assert!(err.to_string().contains(MANIFEST_FILE));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(MANIFEST_FILE), r#"{"completion": true}"#).unwrap();

        assert!(PackageManifest::load(temp.path()).is_err());
    }
}
