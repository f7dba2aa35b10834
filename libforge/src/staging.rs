//! Staging area lifecycle.
//!
//! The staging area is a transient working directory holding a full copy of
//! all module sources plus the generated compiler configuration documents.
//! It is created at run start, exclusively owned by the pipeline for the
//! run's duration, and deleted on both success and failure. It also hosts
//! the intra-run dependency directory that lets later modules import earlier
//! modules' packaged output.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::RunLayout;
use crate::errors::StagingError;
use crate::utils::{copy_dir_recursive, remove_dir_idempotent};

/// Directory name, under the staging root, where packaged modules are staged
/// for resolution by later modules' compile stages.
const DEPS_DIR_NAME: &str = "node_modules";

/// The run-owned staging directory tree.
#[derive(Debug)]
pub struct StagingArea {
    tmp_root: PathBuf,
    root: PathBuf,
}

impl StagingArea {
    /// Creates the staging area by copying the source root into the staging
    /// root. Copy failure is fatal for the run.
    pub fn prepare(layout: &RunLayout) -> Result<Self, StagingError> {
        copy_dir_recursive(&layout.source_root, &layout.staging_root).map_err(|source| {
            StagingError::Copy {
                from: layout.source_root.clone(),
                to: layout.staging_root.clone(),
                source,
            }
        })?;
        debug!(staging_root = %layout.staging_root.display(), "staging area prepared");
        Ok(Self {
            tmp_root: layout.tmp_root.clone(),
            root: layout.staging_root.clone(),
        })
    }

    /// The staging root: a full copy of the source tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The staged directory of one module container.
    #[must_use]
    pub fn container_dir(&self, container: &str) -> PathBuf {
        self.root.join(container)
    }

    /// The shared intra-run dependency directory, keyed by module name.
    #[must_use]
    pub fn deps_dir(&self) -> PathBuf {
        self.root.join(DEPS_DIR_NAME)
    }

    /// Deletes the staging tree. Idempotent: an already-removed tree is not
    /// an error.
    pub fn cleanup(&self) -> io::Result<()> {
        debug!(tmp_root = %self.tmp_root.display(), "removing staging area");
        remove_dir_idempotent(&self.tmp_root)
    }
}
