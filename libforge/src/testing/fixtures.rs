//! On-disk workspace fixtures for pipeline tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{BuildConfig, ModuleSpec, RunLayout};

/// A temporary workspace: a source tree with one directory per module, each
/// holding a version declaration, entry sources, and a colocated manifest.
pub struct WorkspaceFixture {
    dir: TempDir,
    /// The run configuration pointing at the workspace.
    pub config: BuildConfig,
}

impl WorkspaceFixture {
    /// Creates a workspace for the given module names.
    pub fn new(names: &[&str]) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let config = BuildConfig {
            root: "src/lib".to_string(),
            out_dir: "dist".to_string(),
            globals: HashMap::from([("tslib".to_string(), "tslib".to_string())]),
            version: "1.0.0".to_string(),
            libs: names.iter().map(|name| ModuleSpec::named(*name)).collect(),
        };

        let source_root = dir.path().join("src/lib");
        for name in names {
            let module_dir = source_root.join(name);
            fs::create_dir_all(&module_dir).expect("module dir");
            fs::write(
                module_dir.join("version.ts"),
                "/**\n * @version\n */\nexport const VERSION = '0.0.1';\n",
            )
            .expect("version.ts");
            fs::write(module_dir.join("index.ts"), "export {};\n").expect("index.ts");
            fs::write(
                module_dir.join("public_api.ts"),
                "export * from './index';\n",
            )
            .expect("public_api.ts");
            fs::write(
                module_dir.join("package.json"),
                format!("{{\n  \"name\": \"{name}\",\n  \"license\": \"MIT\"\n}}\n"),
            )
            .expect("package.json");
        }

        Self { dir, config }
    }

    /// The workspace base directory.
    pub fn base_dir(&self) -> &Path {
        self.dir.path()
    }

    /// The computed run layout.
    pub fn layout(&self) -> RunLayout {
        self.config.layout(self.dir.path())
    }

    /// One module's source directory.
    pub fn module_source_dir(&self, name: &str) -> PathBuf {
        self.dir.path().join("src/lib").join(name)
    }
}
