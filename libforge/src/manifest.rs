//! The module's publishable manifest document.
//!
//! The packaging finalizer reads a module's base manifest, overwrites the
//! fields that must point at the generated artifacts, and writes the result
//! into the output directory. Keys this crate does not model are preserved
//! verbatim, so repeated runs over unchanged sources produce identical
//! manifests.

use serde::{Deserialize, Serialize};

use crate::core::ModuleDescriptor;

/// File name of a module manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// A publishable package manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Package version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Entry point for consumers of the UMD bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Entry point for es2015 consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es2015: Option<String>,

    /// Entry point for esm consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Type declarations entry point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typings: Option<String>,

    /// Keys not modeled by this schema, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PackageManifest {
    /// Points the manifest at the artifacts generated for `module`.
    pub fn apply_build_outputs(&mut self, module: &ModuleDescriptor) {
        self.name = Some(module.name.clone());
        self.version = Some(module.version.clone());
        self.main = Some(format!("{}.umd.js", module.file_stem()));
        self.es2015 = Some("es2015/index.js".to_string());
        self.module = Some("index.js".to_string());
        self.typings = Some("index.d.ts".to_string());
    }

    /// Renders the manifest as pretty-printed JSON with a trailing newline.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn module() -> ModuleDescriptor {
        ModuleDescriptor {
            name: "ngx/button".to_string(),
            source_dir: PathBuf::from("/src/ngx/button"),
            output_dir: PathBuf::from("/dist/ngx/button"),
            manifest_path: PathBuf::from("/tmp/package.json"),
            config_es2015_path: PathBuf::from("/tmp/tsconfig-build.json"),
            config_esm_path: PathBuf::from("/tmp/tsconfig-esm.json"),
            version: "3.0.1".to_string(),
            container_dir: "ngx/button".to_string(),
        }
    }

    #[test]
    fn test_apply_build_outputs() {
        let mut manifest = PackageManifest::default();
        manifest.apply_build_outputs(&module());

        assert_eq!(manifest.name.as_deref(), Some("ngx/button"));
        assert_eq!(manifest.version.as_deref(), Some("3.0.1"));
        assert_eq!(manifest.main.as_deref(), Some("ngx__button.umd.js"));
        assert_eq!(manifest.es2015.as_deref(), Some("es2015/index.js"));
        assert_eq!(manifest.module.as_deref(), Some("index.js"));
        assert_eq!(manifest.typings.as_deref(), Some("index.d.ts"));
    }

    #[test]
    fn test_unmodeled_keys_survive_rewrite() {
        let mut manifest: PackageManifest = serde_json::from_str(
            r#"{
                "name": "placeholder",
                "license": "MIT",
                "peerDependencies": { "tslib": "^2.0.0" }
            }"#,
        )
        .unwrap();
        manifest.apply_build_outputs(&module());

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["license"], serde_json::json!("MIT"));
        assert_eq!(
            json["peerDependencies"]["tslib"],
            serde_json::json!("^2.0.0")
        );
        assert_eq!(json["name"], serde_json::json!("ngx/button"));
    }

    #[test]
    fn test_pretty_json_is_stable() {
        let manifest: PackageManifest =
            serde_json::from_str(r#"{"name":"a","zeta":1,"alpha":2}"#).unwrap();
        let first = manifest.to_pretty_json().unwrap();
        let second = manifest.to_pretty_json().unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with('\n'));
    }
}
