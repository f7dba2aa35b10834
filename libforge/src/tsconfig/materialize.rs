//! Config materializer.
//!
//! For each module and each compile target, ensures a valid configuration
//! document exists in the staging area, ready for the external compiler to
//! consume. A pre-existing document at the module's resolved path is parsed
//! and merged over the built-in default, preserving user customization; a
//! small fixed subset of fields is always overwritten because it must match
//! the run's computed paths.

use std::path::PathBuf;
use tokio::fs;

use super::{EmitOptions, TsConfig, ES2015_CONFIG_FILE, ESM_CONFIG_FILE};
use crate::core::ModuleDescriptor;
use crate::errors::MaterializeError;
use crate::staging::StagingArea;
use crate::toolchain::CompileTarget;

/// Locations of the generated configuration documents for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedConfigs {
    /// The es2015 document inside the staging tree.
    pub es2015_path: PathBuf,
    /// The esm document inside the staging tree.
    pub esm_path: PathBuf,
}

/// Materializes both configuration documents for one module.
///
/// Errors are reported, never panicked on; the stage pipeline decides to
/// treat them as a stage-scoped failure.
pub async fn materialize_configs(
    module: &ModuleDescriptor,
    staging: &StagingArea,
) -> Result<MaterializedConfigs, MaterializeError> {
    Ok(MaterializedConfigs {
        es2015_path: materialize_one(module, CompileTarget::Es2015, staging).await?,
        esm_path: materialize_one(module, CompileTarget::Esm, staging).await?,
    })
}

async fn materialize_one(
    module: &ModuleDescriptor,
    target: CompileTarget,
    staging: &StagingArea,
) -> Result<PathBuf, MaterializeError> {
    let (user_path, file_name, mut doc) = match target {
        CompileTarget::Es2015 => (
            &module.config_es2015_path,
            ES2015_CONFIG_FILE,
            TsConfig::default_es2015(),
        ),
        CompileTarget::Esm => (&module.config_esm_path, ESM_CONFIG_FILE, TsConfig::default_esm()),
    };

    if user_path.is_file() {
        let text = fs::read_to_string(user_path)
            .await
            .map_err(|source| MaterializeError::Read {
                path: user_path.clone(),
                source,
            })?;
        let user: TsConfig =
            serde_json::from_str(&text).map_err(|source| MaterializeError::Parse {
                path: user_path.clone(),
                source,
            })?;
        doc = doc.merge(user);
    }

    apply_overwrite_set(&mut doc, module, target);

    let out_path = staging.container_dir(&module.container_dir).join(file_name);
    write_document(&out_path, &doc).await?;
    Ok(out_path)
}

/// The fixed subset of fields that must match the run's computed paths,
/// regardless of what the source document says: the output directory, and
/// for the esm target the flat-module emit metadata and entry file.
fn apply_overwrite_set(doc: &mut TsConfig, module: &ModuleDescriptor, target: CompileTarget) {
    match target {
        CompileTarget::Es2015 => {
            doc.compiler_options.out_dir = Some(module.es2015_out_dir());
        }
        CompileTarget::Esm => {
            doc.compiler_options.out_dir = Some(module.output_dir.clone());
            let emit = doc.emit_options.get_or_insert_with(EmitOptions::default);
            emit.flat_entry_file = Some("index.js".to_string());
            emit.module_id = Some(module.name.clone());
            doc.files = vec!["public_api.ts".to_string()];
        }
    }
}

async fn write_document(path: &PathBuf, doc: &TsConfig) -> Result<(), MaterializeError> {
    let text = match serde_json::to_string_pretty(doc) {
        Ok(mut text) => {
            text.push('\n');
            text
        }
        Err(source) => {
            return Err(MaterializeError::Write {
                path: path.clone(),
                source: source.into(),
            })
        }
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| MaterializeError::Write {
                path: path.clone(),
                source,
            })?;
    }
    fs::write(path, text)
        .await
        .map_err(|source| MaterializeError::Write {
            path: path.clone(),
            source,
        })
}
