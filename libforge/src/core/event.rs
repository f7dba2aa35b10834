//! Build event type emitted per stage transition.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ModuleDescriptor;
use crate::utils::iso_timestamp;

/// The phase a build event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildPhase {
    /// A stage began for a module.
    Start,
    /// A stage completed for a module.
    End,
    /// A stage failed; the module's remaining stages are skipped.
    Error,
    /// The whole run completed; emitted once, with no module attached.
    Finished,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::End => write!(f, "end"),
            Self::Error => write!(f, "error"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

impl BuildPhase {
    /// Returns true if the phase terminates a module or the run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error | Self::Finished)
    }
}

/// A progress/error notification produced by the stage pipeline and the
/// module scheduler.
///
/// Events are immutable after creation and are consumed exactly once, in
/// emission order, by a single sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildEvent {
    /// The module the event pertains to, or `None` for pipeline-wide events.
    pub module: Option<ModuleDescriptor>,

    /// The reported phase.
    pub phase: BuildPhase,

    /// Optional human-readable status text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// When the event was produced (ISO 8601).
    pub timestamp: String,
}

impl BuildEvent {
    /// Creates an event for a module stage transition.
    #[must_use]
    pub fn new(
        module: Option<ModuleDescriptor>,
        phase: BuildPhase,
        message: Option<String>,
    ) -> Self {
        Self {
            module,
            phase,
            message,
            timestamp: iso_timestamp(),
        }
    }

    /// Creates a `Start` event for a module.
    #[must_use]
    pub fn start(module: &ModuleDescriptor, message: impl Into<String>) -> Self {
        Self::new(Some(module.clone()), BuildPhase::Start, Some(message.into()))
    }

    /// Creates an `End` event for a module.
    #[must_use]
    pub fn end(module: &ModuleDescriptor, message: impl Into<String>) -> Self {
        Self::new(Some(module.clone()), BuildPhase::End, Some(message.into()))
    }

    /// Creates an `Error` event for a module.
    #[must_use]
    pub fn error(module: &ModuleDescriptor, message: Option<String>) -> Self {
        Self::new(Some(module.clone()), BuildPhase::Error, message)
    }

    /// Creates the pipeline-wide `Finished` event.
    #[must_use]
    pub fn finished() -> Self {
        Self::new(None, BuildPhase::Finished, None)
    }

    /// The module name the event pertains to, if any.
    #[must_use]
    pub fn module_name(&self) -> Option<&str> {
        self.module.as_ref().map(|m| m.name.as_str())
    }
}
