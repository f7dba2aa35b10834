//! Event sink trait and implementations.

use async_trait::async_trait;
use tracing::{debug, error, info, Level};

use crate::core::{BuildEvent, BuildPhase};

/// Trait for sinks that receive build events.
///
/// The scheduler awaits `emit` for every event, preserving program order:
/// events for module *i* always precede events for module *i+1*.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Consumes one build event.
    async fn emit(&self, event: &BuildEvent);

    /// Consumes one build event without blocking.
    ///
    /// This method must never panic; failures are logged and suppressed.
    fn try_emit(&self, event: &BuildEvent);
}

/// A no-op event sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: &BuildEvent) {
        // Intentionally empty - discards all events
    }

    fn try_emit(&self, _event: &BuildEvent) {
        // Intentionally empty - discards all events
    }
}

/// An event sink that renders build events through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event: &BuildEvent) {
        let module = event.module_name().unwrap_or("<run>");
        let message = event.message.as_deref().unwrap_or("");
        match event.phase {
            BuildPhase::Error => {
                error!(module = %module, phase = %event.phase, "{}", message);
            }
            _ if self.level == Level::DEBUG => {
                debug!(module = %module, phase = %event.phase, "{}", message);
            }
            _ => {
                info!(module = %module, phase = %event.phase, "{}", message);
            }
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: &BuildEvent) {
        self.log_event(event);
    }

    fn try_emit(&self, event: &BuildEvent) {
        self.log_event(event);
    }
}

/// A collecting event sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<BuildEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<BuildEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Returns the events collected for one module.
    #[must_use]
    pub fn events_for(&self, module_name: &str) -> Vec<BuildEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.module_name() == Some(module_name))
            .cloned()
            .collect()
    }

    /// Returns the events with a given phase.
    #[must_use]
    pub fn events_with_phase(&self, phase: BuildPhase) -> Vec<BuildEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.phase == phase)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: &BuildEvent) {
        self.events.write().push(event.clone());
    }

    fn try_emit(&self, event: &BuildEvent) {
        self.events.write().push(event.clone());
    }
}
