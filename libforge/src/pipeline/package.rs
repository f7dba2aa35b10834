//! Packaging finalizer.
//!
//! After a module's bundle and minified bundle exist on disk, the finalizer
//! rewrites the manifest to point at the generated artifacts, writes it into
//! the output directory, and stages the finished output into the shared
//! intra-run dependency directory so later modules can resolve it as an
//! import.

use tokio::fs;

use crate::core::ModuleDescriptor;
use crate::errors::StageError;
use crate::manifest::PackageManifest;
use crate::staging::StagingArea;
use crate::utils::copy_dir_recursive;

/// Runs the package stage for one module.
///
/// A manifest that cannot be read or parsed is a fatal stage error for this
/// module.
pub async fn finalize_package(
    module: &ModuleDescriptor,
    staging: &StagingArea,
) -> Result<(), StageError> {
    let text = fs::read_to_string(&module.manifest_path)
        .await
        .map_err(|source| StageError::ManifestRead {
            path: module.manifest_path.clone(),
            source,
        })?;
    let mut manifest: PackageManifest =
        serde_json::from_str(&text).map_err(|source| StageError::ManifestParse {
            path: module.manifest_path.clone(),
            source,
        })?;

    manifest.apply_build_outputs(module);

    let manifest_out = module.packaged_manifest_path();
    let rendered = manifest
        .to_pretty_json()
        .map_err(|source| StageError::Package {
            path: manifest_out.clone(),
            source: source.into(),
        })?;
    fs::create_dir_all(&module.output_dir)
        .await
        .map_err(|source| StageError::Package {
            path: module.output_dir.clone(),
            source,
        })?;
    fs::write(&manifest_out, rendered)
        .await
        .map_err(|source| StageError::Package {
            path: manifest_out,
            source,
        })?;

    let dep_dir = staging.deps_dir().join(&module.name);
    copy_dir_recursive(&module.output_dir, &dep_dir).map_err(|source| StageError::Package {
        path: dep_dir,
        source,
    })?;

    Ok(())
}
