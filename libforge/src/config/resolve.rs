//! Path resolver: raw module specs to immutable module descriptors.
//!
//! Resolution computes absolute, defaulted file locations for each module's
//! manifest and compiler configuration files. Per-file resolution is a fixed
//! three-tier check, first existing path wins:
//!
//! 1. the module-specified override directory under the module's staged
//!    source,
//! 2. the file colocated with the module's staged source,
//! 3. the global fallback at the staging root.
//!
//! A missing source directory or a manifest absent from every tier aborts
//! the whole run; this is a fatal precondition check, not a per-module
//! recoverable error.

use std::path::{Path, PathBuf};

use super::{BuildConfig, ModuleSpec, RunLayout};
use crate::core::ModuleDescriptor;
use crate::errors::ResolveError;
use crate::manifest::MANIFEST_FILE;
use crate::tsconfig::{ES2015_CONFIG_FILE, ESM_CONFIG_FILE};

/// Resolves every raw module entry into a [`ModuleDescriptor`].
///
/// Must run after the staging area is populated: tiers 1-3 check staged
/// paths. Resolution is pure with respect to its inputs; resolving the same
/// configuration twice yields identical descriptors.
pub fn resolve_modules(
    config: &BuildConfig,
    layout: &RunLayout,
) -> Result<Vec<ModuleDescriptor>, ResolveError> {
    if !layout.source_root.is_dir() {
        return Err(ResolveError::MissingSourceRoot(layout.source_root.clone()));
    }
    config
        .libs
        .iter()
        .map(|spec| resolve_module(spec, config, layout))
        .collect()
}

fn resolve_module(
    spec: &ModuleSpec,
    config: &BuildConfig,
    layout: &RunLayout,
) -> Result<ModuleDescriptor, ResolveError> {
    let dir = spec.dir.clone().unwrap_or_else(|| spec.name.clone());

    let source_dir = layout.source_root.join(&dir);
    if !source_dir.is_dir() {
        return Err(ResolveError::MissingSourceDir {
            module: spec.name.clone(),
            path: source_dir,
        });
    }

    let staged_dir = layout.staging_root.join(&dir);
    let manifest_path = resolve_module_file(
        spec.pkg.as_deref(),
        &staged_dir,
        &layout.staging_root,
        MANIFEST_FILE,
    );
    if !manifest_path.is_file() {
        return Err(ResolveError::MissingManifest {
            module: spec.name.clone(),
            path: manifest_path,
        });
    }

    let config_es2015_path = resolve_module_file(
        spec.es2015.as_deref(),
        &staged_dir,
        &layout.staging_root,
        ES2015_CONFIG_FILE,
    );
    let config_esm_path = resolve_module_file(
        spec.esm.as_deref(),
        &staged_dir,
        &layout.staging_root,
        ESM_CONFIG_FILE,
    );

    Ok(ModuleDescriptor {
        name: spec.name.clone(),
        source_dir,
        output_dir: layout.out_root.join(&dir),
        manifest_path,
        config_es2015_path,
        config_esm_path,
        version: spec
            .version
            .clone()
            .unwrap_or_else(|| config.version.clone()),
        container_dir: dir,
    })
}

/// Three-tier file resolution. The override always takes precedence over a
/// colocated file, which takes precedence over the global fallback; the
/// fallback path is returned even when absent (the materializer generates
/// defaults for missing compiler configs).
fn resolve_module_file(
    override_dir: Option<&str>,
    staged_dir: &Path,
    staging_root: &Path,
    file: &str,
) -> PathBuf {
    if let Some(dir) = override_dir {
        let candidate = staged_dir.join(dir).join(file);
        if candidate.is_file() {
            return candidate;
        }
    }
    let colocated = staged_dir.join(file);
    if colocated.is_file() {
        return colocated;
    }
    staging_root.join(file)
}
