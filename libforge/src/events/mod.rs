//! Event sink system for build progress reporting.
//!
//! The pipeline produces a single ordered, finite stream of
//! [`crate::core::BuildEvent`]s consumed by exactly one sink. The terminal
//! presentation layer lives behind the [`EventSink`] trait; this crate ships
//! a `tracing`-backed sink and test sinks only.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
