//! Per-module stage sequence.
//!
//! Drives one module through its ordered build stages, invoking the external
//! collaborators and translating their outcomes into the build event stream.
//! The first failing stage short-circuits the rest; the scheduler emits the
//! module's single `Error` event.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

use super::package::finalize_package;
use super::version::stamp_version;
use crate::core::{BuildEvent, ModuleDescriptor};
use crate::errors::StageError;
use crate::events::EventSink;
use crate::staging::StagingArea;
use crate::toolchain::{BundleOptions, CompileTarget, Toolchain};
use crate::tsconfig::{materialize_configs, MaterializedConfigs};

/// Runs the stage sequence for one module.
pub(crate) struct ModuleStages<'a> {
    module: &'a ModuleDescriptor,
    toolchain: &'a Toolchain,
    staging: &'a StagingArea,
    globals: &'a HashMap<String, String>,
    sink: &'a Arc<dyn EventSink>,
}

impl<'a> ModuleStages<'a> {
    pub(crate) fn new(
        module: &'a ModuleDescriptor,
        toolchain: &'a Toolchain,
        staging: &'a StagingArea,
        globals: &'a HashMap<String, String>,
        sink: &'a Arc<dyn EventSink>,
    ) -> Self {
        Self {
            module,
            toolchain,
            staging,
            globals,
            sink,
        }
    }

    /// Executes stages strictly in order, stopping at the first failure.
    pub(crate) async fn run(&self) -> Result<(), StageError> {
        debug!(module = %self.module.name, "starting module stages");
        self.version_stamp().await?;
        let configs = self.materialize().await?;
        self.compile(&configs.es2015_path, CompileTarget::Es2015)
            .await?;
        self.compile(&configs.esm_path, CompileTarget::Esm).await?;
        self.bundle().await?;
        self.minify().await?;
        self.package().await?;
        Ok(())
    }

    async fn emit_start(&self, message: &str) {
        self.sink.emit(&BuildEvent::start(self.module, message)).await;
    }

    async fn emit_end(&self, message: &str) {
        self.sink.emit(&BuildEvent::end(self.module, message)).await;
    }

    async fn version_stamp(&self) -> Result<(), StageError> {
        self.emit_start("Updating version...").await;
        let stamp = stamp_version(self.module).await?;
        self.emit_end(&stamp.message(&self.module.version)).await;
        Ok(())
    }

    async fn materialize(&self) -> Result<MaterializedConfigs, StageError> {
        self.emit_start("Updating build configs...").await;
        let configs = materialize_configs(self.module, self.staging).await?;
        self.emit_end("Build configs updated").await;
        Ok(configs)
    }

    async fn compile(&self, config_path: &Path, target: CompileTarget) -> Result<(), StageError> {
        self.emit_start(&format!("Building {target}...")).await;
        let out_dir = match target {
            CompileTarget::Es2015 => self.module.es2015_out_dir(),
            CompileTarget::Esm => self.module.output_dir.clone(),
        };
        self.toolchain
            .compiler
            .compile(config_path, &out_dir, target)
            .await
            .map_err(|source| StageError::Compile { target, source })?;
        self.emit_end(&format!("{target} built")).await;
        Ok(())
    }

    async fn bundle(&self) -> Result<(), StageError> {
        self.emit_start("Generating umd bundle...").await;
        let options = BundleOptions {
            output_file: self.module.bundle_path(),
            globals: self.globals.clone(),
            export_name: self.module.export_symbol(),
        };
        self.toolchain
            .bundler
            .bundle(&self.module.bundle_entry(), &options)
            .await
            .map_err(StageError::Bundle)?;
        self.emit_end("umd bundle generated").await;
        Ok(())
    }

    async fn minify(&self) -> Result<(), StageError> {
        self.emit_start("Minifying resources...").await;
        let bundle_path = self.module.bundle_path();
        let output = self
            .toolchain
            .minifier
            .minify(&bundle_path)
            .map_err(StageError::Minify)?;

        let min_path = self.module.min_bundle_path();
        let map_path = sibling_map_path(&min_path);
        fs::write(&min_path, output.code)
            .await
            .map_err(|source| StageError::MinifyWrite {
                path: min_path.clone(),
                source,
            })?;
        fs::write(&map_path, output.map)
            .await
            .map_err(|source| StageError::MinifyWrite {
                path: map_path,
                source,
            })?;
        self.emit_end("Successfully minified resources").await;
        Ok(())
    }

    async fn package(&self) -> Result<(), StageError> {
        self.emit_start("Creating package...").await;
        finalize_package(self.module, self.staging).await?;
        self.emit_end("Package created successfully").await;
        Ok(())
    }
}

/// The source map written next to a minified file: `<file>.map`.
fn sibling_map_path(path: &Path) -> PathBuf {
    let mut os = path.to_path_buf().into_os_string();
    os.push(".map");
    PathBuf::from(os)
}
