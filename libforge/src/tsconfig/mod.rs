//! Compiler configuration documents.
//!
//! Each module is compiled twice, against one configuration document per
//! [`CompileTarget`](crate::toolchain::CompileTarget). A document is an
//! explicit, enumerated schema; keys this crate does not model are preserved
//! verbatim in `extra` maps so user customization survives materialization.

mod materialize;
mod merge;

pub use materialize::{materialize_configs, MaterializedConfigs};
pub use merge::merge_values;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the es2015 configuration document.
pub const ES2015_CONFIG_FILE: &str = "tsconfig-build.json";

/// File name of the esm configuration document.
pub const ESM_CONFIG_FILE: &str = "tsconfig-esm.json";

/// Options consumed by the external compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Base directory for non-relative imports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Emitted module format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Language target of the emitted code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Where the compiler writes its output. Always overwritten by the
    /// materializer with the run's computed path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Source tree root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,

    /// Whether to emit source maps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<bool>,

    /// Whether to inline original sources into the maps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_sources: Option<bool>,

    /// Whether to emit type declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<bool>,

    /// Whether implicit `any` types are allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_implicit_any: Option<bool>,

    /// Whether strict null checking is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strict_null_checks: Option<bool>,

    /// Whether decorator syntax is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental_decorators: Option<bool>,

    /// Whether decorator metadata is emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit_decorator_metadata: Option<bool>,

    /// Standard library references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib: Option<Vec<String>>,

    /// Whether declaration files of dependencies are type-checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_lib_check: Option<bool>,

    /// Import resolution strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_resolution: Option<String>,

    /// Import path remappings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<serde_json::Map<String, serde_json::Value>>,

    /// Options not modeled by this schema, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Emitted-module naming metadata, used by the esm target only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitOptions {
    /// File name of the flat-module entry the compiler emits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_entry_file: Option<String>,

    /// Public identifier of the emitted module.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,

    /// Metadata not modeled by this schema, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One compiler configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    /// Compiler options.
    #[serde(default)]
    pub compiler_options: CompilerOptions,

    /// Entry files handed to the compiler.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// Emitted-module naming metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emit_options: Option<EmitOptions>,

    /// Top-level keys not modeled by this schema, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TsConfig {
    /// The built-in default document for the es2015 target.
    #[must_use]
    pub fn default_es2015() -> Self {
        Self {
            compiler_options: CompilerOptions {
                base_url: Some(".".to_string()),
                module: Some("es2015".to_string()),
                target: Some("es2015".to_string()),
                out_dir: None,
                root_dir: Some(".".to_string()),
                source_map: Some(true),
                inline_sources: Some(true),
                declaration: Some(false),
                no_implicit_any: Some(false),
                strict_null_checks: Some(true),
                experimental_decorators: Some(true),
                emit_decorator_metadata: Some(true),
                lib: Some(vec!["es2015".to_string(), "dom".to_string()]),
                skip_lib_check: Some(true),
                module_resolution: Some("node".to_string()),
                paths: Some(serde_json::Map::new()),
                extra: serde_json::Map::new(),
            },
            files: vec!["index.ts".to_string()],
            emit_options: None,
            extra: serde_json::Map::new(),
        }
    }

    /// The built-in default document for the esm flat-module target.
    ///
    /// Derived from the es2015 default: an es5 language target, type
    /// declarations, and flat-module emit metadata.
    #[must_use]
    pub fn default_esm() -> Self {
        Self::default_es2015().merge(Self {
            compiler_options: CompilerOptions {
                target: Some("es5".to_string()),
                declaration: Some(true),
                ..CompilerOptions::default()
            },
            files: vec!["public_api.ts".to_string()],
            emit_options: Some(EmitOptions {
                flat_entry_file: Some("index.js".to_string()),
                module_id: None,
                extra: serde_json::Map::new(),
            }),
            extra: serde_json::Map::new(),
        })
    }

    /// Deep-merges `patch` into `self`: typed fields present in `patch`
    /// overwrite, absent fields fall back to `self`, and unmodeled `extra`
    /// keys merge recursively (object values merge, scalars and arrays
    /// overwrite).
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        let compiler_options = self.compiler_options.merge(patch.compiler_options);
        let files = if patch.files.is_empty() {
            self.files
        } else {
            patch.files
        };
        let emit_options = match (self.emit_options, patch.emit_options) {
            (Some(base), Some(over)) => Some(base.merge(over)),
            (base, over) => over.or(base),
        };
        let mut extra = self.extra;
        merge::merge_maps(&mut extra, patch.extra);
        Self {
            compiler_options,
            files,
            emit_options,
            extra,
        }
    }
}

impl CompilerOptions {
    /// Field-wise merge; `patch` wins where present.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        let mut extra = self.extra;
        merge::merge_maps(&mut extra, patch.extra);
        Self {
            base_url: patch.base_url.or(self.base_url),
            module: patch.module.or(self.module),
            target: patch.target.or(self.target),
            out_dir: patch.out_dir.or(self.out_dir),
            root_dir: patch.root_dir.or(self.root_dir),
            source_map: patch.source_map.or(self.source_map),
            inline_sources: patch.inline_sources.or(self.inline_sources),
            declaration: patch.declaration.or(self.declaration),
            no_implicit_any: patch.no_implicit_any.or(self.no_implicit_any),
            strict_null_checks: patch.strict_null_checks.or(self.strict_null_checks),
            experimental_decorators: patch.experimental_decorators.or(self.experimental_decorators),
            emit_decorator_metadata: patch.emit_decorator_metadata.or(self.emit_decorator_metadata),
            lib: patch.lib.or(self.lib),
            skip_lib_check: patch.skip_lib_check.or(self.skip_lib_check),
            module_resolution: patch.module_resolution.or(self.module_resolution),
            paths: patch.paths.or(self.paths),
            extra,
        }
    }
}

impl EmitOptions {
    /// Field-wise merge; `patch` wins where present.
    #[must_use]
    pub fn merge(self, patch: Self) -> Self {
        let mut extra = self.extra;
        merge::merge_maps(&mut extra, patch.extra);
        Self {
            flat_entry_file: patch.flat_entry_file.or(self.flat_entry_file),
            module_id: patch.module_id.or(self.module_id),
            extra,
        }
    }
}
