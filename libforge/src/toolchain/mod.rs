//! External collaborator seams.
//!
//! The actual source-to-artifact compiler, the bundler, the minifier, and the
//! resource inliner are opaque operations with a defined input/output
//! contract. The pipeline invokes them through these traits and translates
//! their outcomes into the build event stream; their rejections carry no
//! structured detail beyond an [`anyhow::Error`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The two output formats every module is compiled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileTarget {
    /// The es2015 build, emitted under the `es2015/` subpath.
    Es2015,
    /// The esm flat-module build, emitted at the output root.
    Esm,
}

impl fmt::Display for CompileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Es2015 => write!(f, "es2015"),
            Self::Esm => write!(f, "esm"),
        }
    }
}

/// Options passed to the bundler.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Where the UMD-style single-file artifact is written; a source map is
    /// written next to it at `<output_file>.map`.
    pub output_file: PathBuf,

    /// External dependency names mapped to their global symbol names; these
    /// are treated as external and never inlined into the bundle.
    pub globals: HashMap<String, String>,

    /// The global export symbol of the bundled module.
    pub export_name: String,
}

/// The output of a minifier invocation; the caller writes both parts.
#[derive(Debug, Clone)]
pub struct MinifyOutput {
    /// The minified source text.
    pub code: String,
    /// The source map text.
    pub map: String,
}

/// Compiles one configuration document to one output format.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Runs the compiler against `config_path`, emitting into `out_dir`.
    async fn compile(
        &self,
        config_path: &Path,
        out_dir: &Path,
        target: CompileTarget,
    ) -> anyhow::Result<()>;
}

/// Bundles a flat-module entry file into a single distributable.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Writes the bundle and its source map per [`BundleOptions`].
    async fn bundle(&self, entry_file: &Path, options: &BundleOptions) -> anyhow::Result<()>;
}

/// Minifies a bundled file. Synchronous by contract.
pub trait Minifier: Send + Sync {
    /// Returns the minified code and its source map; the caller writes both.
    fn minify(&self, input_file: &Path) -> anyhow::Result<MinifyOutput>;
}

/// Templates component resource references in place, once per run, before
/// any module stage begins.
#[async_trait]
pub trait ResourceInliner: Send + Sync {
    /// Rewrites resource references under the staging root.
    async fn inline(&self, staging_root: &Path) -> anyhow::Result<()>;
}

/// A resource inliner that leaves the staging tree untouched.
///
/// Used when the module sources carry no external resource references.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpInliner;

#[async_trait]
impl ResourceInliner for NoOpInliner {
    async fn inline(&self, _staging_root: &Path) -> anyhow::Result<()> {
        Ok(())
    }
}

/// The bundle of external collaborators a pipeline run invokes.
#[derive(Clone)]
pub struct Toolchain {
    /// The source-to-artifact compiler.
    pub compiler: Arc<dyn Compiler>,
    /// The bundler.
    pub bundler: Arc<dyn Bundler>,
    /// The minifier.
    pub minifier: Arc<dyn Minifier>,
    /// The resource inliner.
    pub inliner: Arc<dyn ResourceInliner>,
}

impl Toolchain {
    /// Creates a toolchain with a no-op resource inliner.
    #[must_use]
    pub fn new(
        compiler: Arc<dyn Compiler>,
        bundler: Arc<dyn Bundler>,
        minifier: Arc<dyn Minifier>,
    ) -> Self {
        Self {
            compiler,
            bundler,
            minifier,
            inliner: Arc::new(NoOpInliner),
        }
    }

    /// Replaces the resource inliner.
    #[must_use]
    pub fn with_inliner(mut self, inliner: Arc<dyn ResourceInliner>) -> Self {
        self.inliner = inliner;
        self
    }
}

impl fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolchain").finish_non_exhaustive()
    }
}
