//! Error types for the NApp core

use crate::buffers::BufferKind;
use crate::lifecycle::AppState;

/// Errors surfaced synchronously to the host controller.
///
/// Construction failures are fatal for the instance being built: the host has
/// to fix its configuration and construct the App again.
#[derive(Debug, thiserror::Error)]
pub enum NAppError {
    /// A required buffer binding was not supplied at construction
    #[error("Missing required init argument: {0}")]
    MissingDependency(&'static str),

    /// A listener declaration is malformed (empty or blank event names)
    #[error("Invalid listener definition: {0}")]
    Definition(String),

    /// `run` was called on an App that already left the `Created` state
    #[error("App already started (current state: {0})")]
    AlreadyStarted(AppState),

    /// The App was constructed outside of a tokio runtime
    #[error("No tokio runtime available to host the App")]
    NoRuntime,
}

/// Faults raised inside an App's own units of execution.
///
/// These never reach the dispatcher: they are caught at the task boundary,
/// logged and counted.
#[derive(Debug, thiserror::Error)]
pub enum HandlerFault {
    /// The handler returned an error
    #[error("Handler failed: {0}")]
    Failed(String),

    /// The handler panicked
    #[error("Handler panicked: {0}")]
    Panicked(String),

    /// Writing into one of the host buffers failed
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),
}

impl HandlerFault {
    /// Shorthand for [`HandlerFault::Failed`]
    pub fn failed(reason: impl std::fmt::Display) -> Self {
        HandlerFault::Failed(reason.to_string())
    }
}

impl From<serde_json::Error> for HandlerFault {
    fn from(err: serde_json::Error) -> Self {
        HandlerFault::Failed(format!("Event content error: {err}"))
    }
}

/// Errors returned by host-supplied buffer sinks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// The receiving side of the buffer is gone
    #[error("{0} buffer is closed")]
    Closed(BufferKind),

    /// The host refused the event
    #[error("{buffer} buffer rejected event: {reason}")]
    Rejected { buffer: BufferKind, reason: String },
}

/// Result type returned by App lifecycle methods and handlers
pub type HandlerResult = Result<(), HandlerFault>;
