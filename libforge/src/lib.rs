//! # Libforge
//!
//! A multi-target library build pipeline.
//!
//! Libforge drives a set of independently buildable library modules through
//! an ordered sequence of build stages:
//!
//! - **Version stamp**: rewrite the version declaration in the module source
//! - **Config materialize**: generate per-target compiler configuration
//! - **Compile ×2**: es2015 and esm flat-module output
//! - **Bundle**: a single UMD-style distributable with a source map
//! - **Minify**: the minified distributable with its own source map
//! - **Package**: a publishable manifest plus intra-run dependency staging
//!
//! The compiler, bundler, minifier, and resource inliner are external
//! collaborators behind the [`toolchain`] seams. Progress is reported as an
//! ordered stream of [`core::BuildEvent`]s consumed by an
//! [`events::EventSink`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use libforge::prelude::*;
//!
//! let config = BuildConfig::from_file("libforge.json")?;
//! let pipeline = BuildPipeline::new(config, base_dir, toolchain)
//!     .with_sink(Arc::new(LoggingEventSink::default()));
//!
//! let summary = pipeline.run().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod manifest;
pub mod pipeline;
pub mod staging;
pub mod testing;
pub mod toolchain;
pub mod tsconfig;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{BuildConfig, ModuleSpec, RunLayout};
    pub use crate::core::{BuildEvent, BuildPhase, ModuleDescriptor};
    pub use crate::errors::{BuildError, StageError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::manifest::PackageManifest;
    pub use crate::pipeline::{BuildPipeline, RunSummary};
    pub use crate::staging::StagingArea;
    pub use crate::toolchain::{
        BundleOptions, Bundler, CompileTarget, Compiler, Minifier, MinifyOutput, NoOpInliner,
        ResourceInliner, Toolchain,
    };
    pub use crate::tsconfig::{CompilerOptions, EmitOptions, TsConfig};
    pub use crate::utils::{export_symbol, file_stem, iso_timestamp};
}
