//! End-to-end tests for pipeline execution.

#[cfg(test)]
mod tests {
    use crate::core::BuildPhase;
    use crate::errors::BuildError;
    use crate::events::{CollectingEventSink, EventSink};
    use crate::pipeline::BuildPipeline;
    use crate::testing::fixtures::WorkspaceFixture;
    use crate::testing::{FakeBundler, FakeCompiler, FakeMinifier, RecordingInliner};
    use crate::toolchain::{CompileTarget, Compiler, Toolchain};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    struct Harness {
        fixture: WorkspaceFixture,
        compiler: Arc<FakeCompiler>,
        inliner: Arc<RecordingInliner>,
        sink: Arc<CollectingEventSink>,
        pipeline: BuildPipeline,
    }

    fn harness(names: &[&str], compiler: FakeCompiler) -> Harness {
        crate::testing::init_tracing();
        let fixture = WorkspaceFixture::new(names);
        let compiler = Arc::new(compiler);
        let inliner = Arc::new(RecordingInliner::new());
        let sink = Arc::new(CollectingEventSink::new());
        let toolchain = Toolchain::new(
            compiler.clone(),
            Arc::new(FakeBundler::new()),
            Arc::new(FakeMinifier::new()),
        )
        .with_inliner(inliner.clone());
        let pipeline = BuildPipeline::new(fixture.config.clone(), fixture.base_dir(), toolchain)
            .with_sink(sink.clone() as Arc<dyn EventSink>);
        Harness {
            fixture,
            compiler,
            inliner,
            sink,
            pipeline,
        }
    }

    #[tokio::test]
    async fn test_full_run_builds_every_module() {
        let h = harness(&["core", "widgets"], FakeCompiler::new());
        let summary = h.pipeline.run().await.unwrap();
        assert_eq!(summary.modules_built, 2);

        let layout = h.fixture.layout();
        for name in ["core", "widgets"] {
            let out = layout.out_root.join(name);
            assert!(out.join("es2015/index.js").is_file());
            assert!(out.join("index.js").is_file());
            assert!(out.join(format!("{name}.umd.js")).is_file());
            assert!(out.join(format!("{name}.umd.js.map")).is_file());
            assert!(out.join(format!("{name}.umd.min.js")).is_file());
            assert!(out.join(format!("{name}.umd.min.js.map")).is_file());

            let manifest: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(out.join("package.json")).unwrap())
                    .unwrap();
            assert_eq!(manifest["name"], serde_json::json!(name));
            assert_eq!(manifest["version"], serde_json::json!("1.0.0"));
            assert_eq!(manifest["main"], serde_json::json!(format!("{name}.umd.js")));
            assert_eq!(manifest["es2015"], serde_json::json!("es2015/index.js"));
            assert_eq!(manifest["module"], serde_json::json!("index.js"));
        }

        // The staging tree is gone; the run ends with a single finished event.
        assert!(!layout.tmp_root.exists());
        let events = h.sink.events();
        assert_eq!(events.last().map(|e| e.phase), Some(BuildPhase::Finished));
        assert_eq!(h.sink.events_with_phase(BuildPhase::Finished).len(), 1);
        assert!(h.sink.events_with_phase(BuildPhase::Error).is_empty());

        // Program order: every core event precedes every widgets event.
        let core_last = events
            .iter()
            .rposition(|e| e.module_name() == Some("core"))
            .unwrap();
        let widgets_first = events
            .iter()
            .position(|e| e.module_name() == Some("widgets"))
            .unwrap();
        assert!(core_last < widgets_first);

        // The inliner ran once, before any module stage, on the staging root.
        assert_eq!(h.inliner.roots().len(), 1);

        // The version declaration was stamped in the module source.
        let version = fs::read_to_string(h.fixture.module_source_dir("core").join("version.ts"))
            .unwrap();
        assert!(version.contains("'1.0.0'"));
    }

    #[tokio::test]
    async fn test_primary_compile_failure_emits_one_error_and_aborts() {
        let h = harness(
            &["core", "widgets"],
            FakeCompiler::new().failing_on(CompileTarget::Es2015),
        );
        let err = h.pipeline.run().await.unwrap_err();
        assert!(matches!(
            &err,
            BuildError::Stage { module, .. } if module == "core"
        ));
        assert!(!err.is_fatal());

        // Exactly one error event for the failing module, and nothing after
        // its compile stage.
        let errors = h.sink.events_with_phase(BuildPhase::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].module_name(), Some("core"));

        let core_starts: Vec<String> = h
            .sink
            .events_for("core")
            .iter()
            .filter(|e| e.phase == BuildPhase::Start)
            .filter_map(|e| e.message.clone())
            .collect();
        assert_eq!(
            core_starts,
            vec![
                "Updating version...",
                "Updating build configs...",
                "Building es2015...",
            ]
        );

        // The scheduler is error-aborting: the second module never started.
        assert!(h.sink.events_for("widgets").is_empty());
        assert!(h.sink.events_with_phase(BuildPhase::Finished).is_empty());

        // Global cleanup removed both the staging and output trees.
        let layout = h.fixture.layout();
        assert!(!layout.tmp_root.exists());
        assert!(!layout.out_root.exists());
    }

    #[tokio::test]
    async fn test_materialize_failure_is_stage_scoped() {
        let h = harness(&["core"], FakeCompiler::new());
        // A malformed colocated config reaches the materializer through the
        // staged copy.
        fs::write(
            h.fixture.module_source_dir("core").join("tsconfig-build.json"),
            "{ nope",
        )
        .unwrap();

        let err = h.pipeline.run().await.unwrap_err();
        assert!(matches!(&err, BuildError::Stage { module, .. } if module == "core"));

        let errors = h.sink.events_with_phase(BuildPhase::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .message
            .as_deref()
            .unwrap_or_default()
            .contains("compiler config"));
        // The compiler was never invoked.
        assert!(h.compiler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_manifest_is_fatal_before_any_stage() {
        let h = harness(&["core"], FakeCompiler::new());
        fs::remove_file(h.fixture.module_source_dir("core").join("package.json")).unwrap();

        let err = h.pipeline.run().await.unwrap_err();
        assert!(matches!(err, BuildError::Resolve(_)));
        assert!(err.is_fatal());
        assert!(h.sink.is_empty());

        let layout = h.fixture.layout();
        assert!(!layout.tmp_root.exists());
        assert!(!layout.out_root.exists());
    }

    /// A compiler that checks, at the moment module `b` compiles, whether
    /// module `a`'s packaged output is already staged in the shared
    /// dependency directory.
    #[derive(Debug)]
    struct DependencyProbeCompiler {
        inner: FakeCompiler,
        dep_manifest: PathBuf,
        probe_dir_suffix: String,
        observed: Mutex<Option<bool>>,
    }

    #[async_trait]
    impl Compiler for DependencyProbeCompiler {
        async fn compile(
            &self,
            config_path: &Path,
            out_dir: &Path,
            target: CompileTarget,
        ) -> anyhow::Result<()> {
            if out_dir.to_string_lossy().ends_with(&self.probe_dir_suffix) {
                let seen = self.dep_manifest.is_file();
                let mut observed = self.observed.lock();
                if observed.is_none() {
                    *observed = Some(seen);
                }
            }
            self.inner.compile(config_path, out_dir, target).await
        }
    }

    #[tokio::test]
    async fn test_later_module_sees_earlier_packaged_output() {
        crate::testing::init_tracing();
        let fixture = WorkspaceFixture::new(&["a", "b"]);
        let layout = fixture.layout();
        let compiler = Arc::new(DependencyProbeCompiler {
            inner: FakeCompiler::new(),
            dep_manifest: layout.staging_root.join("node_modules/a/package.json"),
            probe_dir_suffix: "/b/es2015".to_string(),
            observed: Mutex::new(None),
        });
        let toolchain = Toolchain::new(
            compiler.clone(),
            Arc::new(FakeBundler::new()),
            Arc::new(FakeMinifier::new()),
        );
        let pipeline = BuildPipeline::new(fixture.config.clone(), fixture.base_dir(), toolchain);

        pipeline.run().await.unwrap();

        // b's first compile observed a's package already present.
        assert_eq!(*compiler.observed.lock(), Some(true));
    }

    #[tokio::test]
    async fn test_repeated_runs_produce_identical_manifests() {
        let h = harness(&["core"], FakeCompiler::new());
        h.pipeline.run().await.unwrap();
        let manifest_path = h.fixture.layout().out_root.join("core/package.json");
        let first = fs::read(&manifest_path).unwrap();

        let second_pipeline = BuildPipeline::new(
            h.fixture.config.clone(),
            h.fixture.base_dir(),
            crate::testing::fake_toolchain(),
        );
        second_pipeline.run().await.unwrap();
        let second = fs::read(&manifest_path).unwrap();

        assert_eq!(first, second);
    }
}
