//! Event names and the event payload handed to listeners

use crate::utils::{current_timestamp, generate_id};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of the event every App implicitly listens to.
///
/// Delivering it is the only way for the host to start an App's shutdown.
pub const SHUTDOWN_EVENT: &str = "KycoShutdownEvent";

/// Opaque identifier classifying an event for dispatch.
///
/// Matching is exact string equality; several listeners may share a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventName(CompactString);

impl EventName {
    pub fn new(name: &str) -> Self {
        Self(CompactString::new(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True for the reserved shutdown event
    pub fn is_shutdown(&self) -> bool {
        self.0 == SHUTDOWN_EVENT
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self(CompactString::from(name))
    }
}

impl From<&String> for EventName {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for EventName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Event payload delivered to Apps.
///
/// Listeners receive it behind an `Arc`, so one delivery fanned out to many
/// handlers shares a single allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycoEvent {
    /// Unique id of this event instance
    pub id: String,
    /// Name used for dispatch
    pub name: EventName,
    /// Free-form content
    #[serde(default)]
    pub content: serde_json::Value,
    /// Name of the App that produced the event, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl KycoEvent {
    /// Create an event with empty content
    pub fn new(name: impl Into<EventName>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            content: serde_json::Value::Null,
            source: None,
            timestamp: current_timestamp(),
        }
    }

    /// The reserved shutdown event
    pub fn shutdown() -> Self {
        Self::new(SHUTDOWN_EVENT)
    }

    /// Attach content
    pub fn with_content(mut self, content: serde_json::Value) -> Self {
        self.content = content;
        self
    }

    /// Attach serializable content
    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Result<Self, serde_json::Error> {
        self.content = serde_json::to_value(payload)?;
        Ok(self)
    }

    /// Record the producing App
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Deserialize the content into a typed payload
    pub fn payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.content)
    }
}
