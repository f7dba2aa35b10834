//! Testing utilities for libforge pipelines.
//!
//! This module provides:
//! - Mock external collaborators that write plausible artifacts to disk
//! - A workspace fixture builder (test builds only)

mod mocks;

#[cfg(test)]
pub mod fixtures;

pub use mocks::{
    fake_toolchain, CompileCall, FakeBundler, FakeCompiler, FakeMinifier, RecordingInliner,
};

/// Initializes a tracing subscriber for tests. Repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
