//! Run configuration for the build pipeline.
//!
//! The configuration document (`libforge.json`) is read once at process
//! start and never re-validated mid-run. It names the source root, the
//! output directory, the external globals map used for bundling, the default
//! version string, and the raw module list. The path resolver turns the raw
//! list into immutable [`crate::core::ModuleDescriptor`]s.

mod resolve;

pub use resolve::resolve_modules;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// The name of the transient directory holding the staging area.
const TMP_DIR_NAME: &str = ".tmp";

/// One raw module entry, pre-resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpec {
    /// Unique module name.
    pub name: String,

    /// Directory under the source root; defaults to the module name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Override directory (relative to the module's staged source) holding
    /// the module's manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg: Option<String>,

    /// Override directory holding the es2015 compiler configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es2015: Option<String>,

    /// Override directory holding the esm compiler configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esm: Option<String>,

    /// Per-module version; defaults to the global build version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModuleSpec {
    /// Creates a spec with only a name, everything else defaulted.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir: None,
            pkg: None,
            es2015: None,
            esm: None,
            version: None,
        }
    }
}

/// The run configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Source root directory, relative to the workspace base.
    pub root: String,

    /// Global output directory, relative to the workspace base.
    pub out_dir: String,

    /// External dependency names mapped to their global symbols, passed to
    /// the bundler as externals.
    #[serde(default)]
    pub globals: HashMap<String, String>,

    /// Default version applied to modules without one of their own.
    pub version: String,

    /// The raw module list, in build order.
    pub libs: Vec<ModuleSpec>,
}

impl BuildConfig {
    /// Loads the configuration document from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Computes the on-disk layout of a run rooted at `base_dir`.
    ///
    /// `base_dir` must be absolute so every resolved path is absolute.
    #[must_use]
    pub fn layout(&self, base_dir: &Path) -> RunLayout {
        let source_root = base_dir.join(&self.root);
        let tmp_root = base_dir.join(TMP_DIR_NAME);
        let staging_name = source_root
            .file_name()
            .map_or_else(|| "staging".to_string(), |n| n.to_string_lossy().into_owned());
        RunLayout {
            staging_root: tmp_root.join(staging_name),
            out_root: base_dir.join(&self.out_dir),
            base_dir: base_dir.to_path_buf(),
            source_root,
            tmp_root,
        }
    }
}

/// Fully-computed directory layout for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    /// The workspace base directory.
    pub base_dir: PathBuf,

    /// Absolute source root (`{base}/{root}`).
    pub source_root: PathBuf,

    /// Absolute output root (`{base}/{outDir}`).
    pub out_root: PathBuf,

    /// The transient directory owning the staging area (`{base}/.tmp`).
    pub tmp_root: PathBuf,

    /// The staging area root (`{tmp}/{basename(root)}`).
    pub staging_root: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_json() -> &'static str {
        r#"{
            "root": "src/lib",
            "outDir": "dist",
            "globals": { "tslib": "tslib" },
            "version": "2.1.0",
            "libs": [
                { "name": "core" },
                { "name": "widgets", "dir": "widgets", "version": "0.9.0" }
            ]
        }"#
    }

    #[test]
    fn test_config_parses() {
        let config: BuildConfig = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(config.root, "src/lib");
        assert_eq!(config.out_dir, "dist");
        assert_eq!(config.version, "2.1.0");
        assert_eq!(config.libs.len(), 2);
        assert_eq!(config.libs[0], ModuleSpec::named("core"));
        assert_eq!(config.libs[1].version.as_deref(), Some("0.9.0"));
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libforge.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = BuildConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("cannot parse config"));
    }

    #[test]
    fn test_layout_paths() {
        let config: BuildConfig = serde_json::from_str(sample_json()).unwrap();
        let layout = config.layout(Path::new("/ws"));

        assert_eq!(layout.source_root, PathBuf::from("/ws/src/lib"));
        assert_eq!(layout.out_root, PathBuf::from("/ws/dist"));
        assert_eq!(layout.tmp_root, PathBuf::from("/ws/.tmp"));
        assert_eq!(layout.staging_root, PathBuf::from("/ws/.tmp/lib"));
    }
}
