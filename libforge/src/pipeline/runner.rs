//! Module scheduler and run lifecycle.
//!
//! Modules build one at a time: each module's stage sequence runs to a
//! terminal state before the next module starts, because later modules may
//! import an earlier module's packaged output from the shared dependency
//! directory. The run is error-aborting: the first stage-scoped error stops
//! the scheduler, deletes the staging and output directories, and fails the
//! run.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use super::stages::ModuleStages;
use crate::config::{resolve_modules, BuildConfig, RunLayout};
use crate::core::BuildEvent;
use crate::errors::BuildError;
use crate::events::{EventSink, NoOpEventSink};
use crate::staging::StagingArea;
use crate::toolchain::Toolchain;
use crate::utils::remove_dir_idempotent;

/// The outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// How many modules were built and packaged.
    pub modules_built: usize,
}

/// The build pipeline: path resolution, staging, per-module stages, and the
/// serial module scheduler, emitting one ordered event stream.
pub struct BuildPipeline {
    config: BuildConfig,
    layout: RunLayout,
    toolchain: Toolchain,
    sink: Arc<dyn EventSink>,
}

impl BuildPipeline {
    /// Creates a pipeline rooted at `base_dir` (must be absolute).
    ///
    /// Events are discarded until a sink is attached with
    /// [`with_sink`](Self::with_sink).
    #[must_use]
    pub fn new(config: BuildConfig, base_dir: &Path, toolchain: Toolchain) -> Self {
        let layout = config.layout(base_dir);
        Self {
            config,
            layout,
            toolchain,
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Attaches the single event sink consuming the run's event stream.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The computed directory layout of this run.
    #[must_use]
    pub fn layout(&self) -> &RunLayout {
        &self.layout
    }

    /// Executes the whole run.
    ///
    /// On success the staging area is deleted and the output directory holds
    /// every module's artifacts. On any failure - fatal precondition or
    /// stage-scoped error - both the staging area and the output directory
    /// are deleted before the error is returned, so no partial artifacts are
    /// left in the publish location.
    pub async fn run(&self) -> Result<RunSummary, BuildError> {
        info!(modules = self.config.libs.len(), "starting build run");

        // A previous run may have left trees behind.
        self.remove_run_dirs();

        let staging = match StagingArea::prepare(&self.layout) {
            Ok(staging) => staging,
            Err(err) => {
                self.remove_run_dirs();
                return Err(err.into());
            }
        };

        match self.run_modules(&staging).await {
            Ok(summary) => {
                self.sink.emit(&BuildEvent::finished()).await;
                if let Err(err) = staging.cleanup() {
                    warn!(error = %err, "staging cleanup failed");
                }
                info!(modules = summary.modules_built, "build run finished");
                Ok(summary)
            }
            Err(err) => {
                self.remove_run_dirs();
                Err(err)
            }
        }
    }

    async fn run_modules(&self, staging: &StagingArea) -> Result<RunSummary, BuildError> {
        let modules = resolve_modules(&self.config, &self.layout)?;

        self.toolchain
            .inliner
            .inline(staging.root())
            .await
            .map_err(BuildError::Inline)?;

        for module in &modules {
            let stages = ModuleStages::new(
                module,
                &self.toolchain,
                staging,
                &self.config.globals,
                &self.sink,
            );
            if let Err(stage_err) = stages.run().await {
                self.sink
                    .emit(&BuildEvent::error(module, Some(stage_err.to_string())))
                    .await;
                return Err(BuildError::Stage {
                    module: module.name.clone(),
                    source: stage_err,
                });
            }
        }

        Ok(RunSummary {
            modules_built: modules.len(),
        })
    }

    /// Deletes the staging and output trees. Best effort: a failed removal
    /// is logged, not propagated.
    fn remove_run_dirs(&self) {
        for dir in [&self.layout.tmp_root, &self.layout.out_root] {
            if let Err(err) = remove_dir_idempotent(dir) {
                warn!(dir = %dir.display(), error = %err, "cleanup failed");
            }
        }
    }
}
