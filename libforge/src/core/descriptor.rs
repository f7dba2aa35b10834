//! Resolved module descriptor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{export_symbol, file_stem};

/// One independently buildable library unit, fully resolved.
///
/// Every path field is absolute and was resolved (and, where required,
/// existence-checked) by the path resolver before the stage pipeline runs;
/// the pipeline never performs its own path defaulting. Descriptors are
/// immutable after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Unique module name; derives output filenames and the export symbol.
    pub name: String,

    /// Absolute path to the module's source tree.
    pub source_dir: PathBuf,

    /// Absolute path for the module's build artifacts.
    pub output_dir: PathBuf,

    /// Absolute path to the module's base manifest document.
    pub manifest_path: PathBuf,

    /// Absolute path to the es2015 compiler configuration document.
    pub config_es2015_path: PathBuf,

    /// Absolute path to the esm compiler configuration document.
    pub config_esm_path: PathBuf,

    /// Semantic version for this module in this run.
    pub version: String,

    /// Un-prefixed directory name, used for writing configs into the
    /// staging tree.
    pub container_dir: String,
}

impl ModuleDescriptor {
    /// The output file stem derived from the module name
    /// (`ngx/button` → `ngx__button`).
    #[must_use]
    pub fn file_stem(&self) -> String {
        file_stem(&self.name)
    }

    /// The UMD global export symbol derived from the module name
    /// (`ngx/button-group` → `ngx.buttonGroup`).
    #[must_use]
    pub fn export_symbol(&self) -> String {
        export_symbol(&self.name)
    }

    /// The flat-module entry file the bundler consumes.
    #[must_use]
    pub fn bundle_entry(&self) -> PathBuf {
        self.output_dir.join("index.js")
    }

    /// The UMD bundle output path.
    #[must_use]
    pub fn bundle_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.umd.js", self.file_stem()))
    }

    /// The minified UMD bundle output path.
    #[must_use]
    pub fn min_bundle_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.umd.min.js", self.file_stem()))
    }

    /// The es2015 compile output directory.
    #[must_use]
    pub fn es2015_out_dir(&self) -> PathBuf {
        self.output_dir.join("es2015")
    }

    /// The version-declaration file stamped before compiling.
    #[must_use]
    pub fn version_file(&self) -> PathBuf {
        self.source_dir.join("version.ts")
    }

    /// The generated manifest path inside the output directory.
    #[must_use]
    pub fn packaged_manifest_path(&self) -> PathBuf {
        self.output_dir.join("package.json")
    }
}
