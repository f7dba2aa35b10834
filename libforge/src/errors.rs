//! Error types for the libforge build pipeline.
//!
//! Two severities exist: *fatal* errors abort the entire run before or
//! between modules (unresolvable paths, staging copy failure, config load),
//! while *stage-scoped* errors abort the remaining stages of the current
//! module and are surfaced as an `Error` build event.

use std::path::PathBuf;
use thiserror::Error;

use crate::toolchain::CompileTarget;

/// The main error type for a pipeline run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The run configuration document could not be loaded.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Module path resolution failed.
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// The staging area could not be prepared.
    #[error("{0}")]
    Staging(#[from] StagingError),

    /// The resource inliner failed before any module stage began.
    #[error("resource inlining failed: {0}")]
    Inline(#[source] anyhow::Error),

    /// A stage of a single module failed.
    #[error("module `{module}`: {source}")]
    Stage {
        /// Name of the module whose stage failed.
        module: String,
        /// The underlying stage error.
        #[source]
        source: StageError,
    },
}

impl BuildError {
    /// Returns true if the error is fatal rather than stage-scoped.
    ///
    /// Stage-scoped errors still fail the run (the scheduler is
    /// error-aborting), but they identify a single module.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Stage { .. })
    }
}

/// Errors loading the run configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("cannot parse config {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced by the path resolver.
///
/// These are fatal precondition failures, not per-module recoverable errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The global source root does not exist.
    #[error("source root does not exist: {0}")]
    MissingSourceRoot(PathBuf),

    /// A module's source directory does not exist.
    #[error("module `{module}`: source directory does not exist: {path}")]
    MissingSourceDir {
        /// Name of the module.
        module: String,
        /// The missing directory.
        path: PathBuf,
    },

    /// A module's manifest could not be found at any resolution tier.
    #[error("module `{module}`: manifest does not exist: {path}")]
    MissingManifest {
        /// Name of the module.
        module: String,
        /// The last candidate path checked.
        path: PathBuf,
    },
}

/// Errors preparing or tearing down the staging area.
#[derive(Debug, Error)]
pub enum StagingError {
    /// Copying the source tree into the staging area failed.
    #[error("cannot stage {from} into {to}: {source}")]
    Copy {
        /// Source directory of the copy.
        from: PathBuf,
        /// Destination directory of the copy.
        to: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A stage-scoped error: aborts the remaining stages of one module.
#[derive(Debug, Error)]
pub enum StageError {
    /// The version-declaration rewrite failed.
    #[error("version stamp failed: {0}")]
    VersionStamp(#[source] std::io::Error),

    /// Compiler configuration materialization failed.
    #[error("{0}")]
    Materialize(#[from] MaterializeError),

    /// An external compile invocation was rejected.
    #[error("{target} build failed: {source}")]
    Compile {
        /// The compile target that failed.
        target: CompileTarget,
        /// The opaque collaborator failure.
        #[source]
        source: anyhow::Error,
    },

    /// The external bundler was rejected.
    #[error("bundling failed: {0}")]
    Bundle(#[source] anyhow::Error),

    /// The external minifier was rejected.
    #[error("minification failed: {0}")]
    Minify(#[source] anyhow::Error),

    /// The minified output could not be written.
    #[error("cannot write minified output {path}: {source}")]
    MinifyWrite {
        /// Path of the file being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The module's base manifest could not be read.
    #[error("cannot read manifest {path}: {source}")]
    ManifestRead {
        /// Path of the manifest file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The module's base manifest is not valid JSON.
    #[error("cannot parse manifest {path}: {source}")]
    ManifestParse {
        /// Path of the manifest file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The packaged output could not be written or staged.
    #[error("packaging failed for {path}: {source}")]
    Package {
        /// The path being written or copied.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors materializing a compiler configuration document.
///
/// Reported to the caller without panicking; the stage pipeline decides to
/// treat it as a stage-scoped failure.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// A pre-existing configuration document could not be read.
    #[error("cannot read compiler config {path}: {source}")]
    Read {
        /// Path of the configuration document.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A pre-existing configuration document is not valid JSON.
    #[error("cannot parse compiler config {path}: {source}")]
    Parse {
        /// Path of the configuration document.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The generated configuration document could not be written.
    #[error("cannot write compiler config {path}: {source}")]
    Write {
        /// Path of the configuration document.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
