//! Mock external collaborators.
//!
//! The fakes record their invocations and write plausible artifacts to disk
//! so pipeline tests exercise the real staging, bundling, and packaging
//! side effects without a toolchain installed.

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::toolchain::{
    BundleOptions, Bundler, CompileTarget, Compiler, Minifier, MinifyOutput, ResourceInliner,
    Toolchain,
};

/// One recorded compile invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCall {
    /// The configuration document the compiler was pointed at.
    pub config_path: PathBuf,
    /// The output directory the compiler was given.
    pub out_dir: PathBuf,
    /// The requested target.
    pub target: CompileTarget,
}

/// A compiler that records calls and emits placeholder outputs.
#[derive(Debug, Default)]
pub struct FakeCompiler {
    calls: Mutex<Vec<CompileCall>>,
    fail_target: Mutex<Option<CompileTarget>>,
}

impl FakeCompiler {
    /// Creates a compiler that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every compile of `target` fail.
    #[must_use]
    pub fn failing_on(self, target: CompileTarget) -> Self {
        *self.fail_target.lock() = Some(target);
        self
    }

    /// Returns the recorded compile invocations, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CompileCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Compiler for FakeCompiler {
    async fn compile(
        &self,
        config_path: &Path,
        out_dir: &Path,
        target: CompileTarget,
    ) -> anyhow::Result<()> {
        self.calls.lock().push(CompileCall {
            config_path: config_path.to_path_buf(),
            out_dir: out_dir.to_path_buf(),
            target,
        });
        if *self.fail_target.lock() == Some(target) {
            return Err(anyhow!("compiler rejected {target} build"));
        }

        fs::create_dir_all(out_dir)?;
        match target {
            CompileTarget::Es2015 => {
                fs::write(out_dir.join("index.js"), "// es2015 output\n")?;
            }
            CompileTarget::Esm => {
                fs::write(out_dir.join("index.js"), "// esm flat module\n")?;
                fs::write(out_dir.join("index.d.ts"), "export {};\n")?;
            }
        }
        Ok(())
    }
}

/// A bundler that writes the bundle file and its source map.
#[derive(Debug, Default)]
pub struct FakeBundler {
    bundles: Mutex<Vec<(PathBuf, String)>>,
    failing: Mutex<bool>,
}

impl FakeBundler {
    /// Creates a bundler that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every bundle invocation fail.
    #[must_use]
    pub fn failing(self) -> Self {
        *self.failing.lock() = true;
        self
    }

    /// Returns `(output_file, export_name)` for each recorded invocation.
    #[must_use]
    pub fn bundles(&self) -> Vec<(PathBuf, String)> {
        self.bundles.lock().clone()
    }
}

#[async_trait]
impl Bundler for FakeBundler {
    async fn bundle(&self, entry_file: &Path, options: &BundleOptions) -> anyhow::Result<()> {
        self.bundles
            .lock()
            .push((options.output_file.clone(), options.export_name.clone()));
        if *self.failing.lock() {
            return Err(anyhow!("bundler rejected {}", entry_file.display()));
        }

        let entry = fs::read_to_string(entry_file)?;
        let bundle = format!(
            "// umd bundle: {} (externals: {})\n{entry}",
            options.export_name,
            options.globals.len(),
        );
        fs::write(&options.output_file, bundle)?;

        let mut map_file = options.output_file.clone().into_os_string();
        map_file.push(".map");
        fs::write(PathBuf::from(map_file), "{\"version\":3}\n")?;
        Ok(())
    }
}

/// A minifier that strips comment lines from its input.
#[derive(Debug, Default)]
pub struct FakeMinifier {
    failing: bool,
}

impl FakeMinifier {
    /// Creates a minifier that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every minify invocation fail.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl Minifier for FakeMinifier {
    fn minify(&self, input_file: &Path) -> anyhow::Result<MinifyOutput> {
        if self.failing {
            return Err(anyhow!("minifier rejected {}", input_file.display()));
        }
        let text = fs::read_to_string(input_file)?;
        let code = text
            .lines()
            .filter(|line| !line.trim_start().starts_with("//"))
            .collect::<Vec<_>>()
            .join("");
        Ok(MinifyOutput {
            code,
            map: "{\"version\":3}\n".to_string(),
        })
    }
}

/// An inliner that records the staging roots it was handed.
#[derive(Debug, Default)]
pub struct RecordingInliner {
    roots: Mutex<Vec<PathBuf>>,
}

impl RecordingInliner {
    /// Creates a new recording inliner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the staging roots inlined, in order.
    #[must_use]
    pub fn roots(&self) -> Vec<PathBuf> {
        self.roots.lock().clone()
    }
}

#[async_trait]
impl ResourceInliner for RecordingInliner {
    async fn inline(&self, staging_root: &Path) -> anyhow::Result<()> {
        self.roots.lock().push(staging_root.to_path_buf());
        Ok(())
    }
}

/// A toolchain of happy-path fakes.
#[must_use]
pub fn fake_toolchain() -> Toolchain {
    Toolchain::new(
        Arc::new(FakeCompiler::new()),
        Arc::new(FakeBundler::new()),
        Arc::new(FakeMinifier::new()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_compiler_records_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FakeCompiler::new();
        compiler
            .compile(Path::new("/cfg.json"), dir.path(), CompileTarget::Esm)
            .await
            .unwrap();

        assert_eq!(compiler.calls().len(), 1);
        assert_eq!(compiler.calls()[0].target, CompileTarget::Esm);
        assert!(dir.path().join("index.js").is_file());
        assert!(dir.path().join("index.d.ts").is_file());
    }

    #[tokio::test]
    async fn test_fake_compiler_failure() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = FakeCompiler::new().failing_on(CompileTarget::Es2015);

        let err = compiler
            .compile(Path::new("/cfg.json"), dir.path(), CompileTarget::Es2015)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("es2015"));

        compiler
            .compile(Path::new("/cfg.json"), dir.path(), CompileTarget::Esm)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_fake_bundler_writes_map() {
        let dir = tempfile::tempdir().unwrap();
        let entry = dir.path().join("index.js");
        fs::write(&entry, "var x = 1;\n").unwrap();

        let bundler = FakeBundler::new();
        let options = BundleOptions {
            output_file: dir.path().join("core.umd.js"),
            globals: std::collections::HashMap::new(),
            export_name: "core".to_string(),
        };
        bundler.bundle(&entry, &options).await.unwrap();

        assert!(dir.path().join("core.umd.js").is_file());
        assert!(dir.path().join("core.umd.js.map").is_file());
        assert_eq!(bundler.bundles()[0].1, "core");
    }

    #[test]
    fn test_fake_minifier_strips_comments() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("core.umd.js");
        fs::write(&input, "// banner\nvar x = 1;\n").unwrap();

        let output = FakeMinifier::new().minify(&input).unwrap();
        assert_eq!(output.code, "var x = 1;");
        assert!(output.map.contains("version"));
    }
}
