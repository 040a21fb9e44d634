//! Host buffer bindings
//!
//! Every App writes into three buffers owned by the controller: inbound
//! messages, outbound messages and the inter-app event buffer. The core only
//! checks that all three were supplied; what a buffer does with an event is the
//! host's business, and so is its thread-safety.

use crate::error::{BufferError, NAppError};
use crate::event::KycoEvent;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A host-supplied sink for events.
///
/// Any `Fn(KycoEvent) -> Result<(), BufferError>` closure is a sink.
pub trait BufferSink: Send + Sync {
    fn add(&self, event: KycoEvent) -> Result<(), BufferError>;
}

impl<F> BufferSink for F
where
    F: Fn(KycoEvent) -> Result<(), BufferError> + Send + Sync,
{
    fn add(&self, event: KycoEvent) -> Result<(), BufferError> {
        self(event)
    }
}

/// The three buffers an App requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferKind {
    Inbound,
    Outbound,
    InterApp,
}

impl BufferKind {
    pub const ALL: [BufferKind; 3] = [BufferKind::Inbound, BufferKind::Outbound, BufferKind::InterApp];

    /// Configuration key under which the host supplies this buffer
    pub const fn key(self) -> &'static str {
        match self {
            BufferKind::Inbound => "inbound_sink",
            BufferKind::Outbound => "outbound_sink",
            BufferKind::InterApp => "interapp_sink",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BufferKind::Inbound => "inbound",
            BufferKind::Outbound => "outbound",
            BufferKind::InterApp => "inter-app",
        };
        f.write_str(label)
    }
}

/// Adapt an unbounded tokio sender into a sink
pub fn channel_sink(kind: BufferKind, sender: mpsc::UnboundedSender<KycoEvent>) -> Arc<dyn BufferSink> {
    Arc::new(move |event: KycoEvent| {
        sender.send(event).map_err(|_| BufferError::Closed(kind))
    })
}

/// Construction configuration handed to an App by its host.
///
/// The three sinks are optional here so a missing one can be reported by key
/// when the App is built.
#[derive(Clone, Default)]
pub struct NAppConfig {
    pub inbound_sink: Option<Arc<dyn BufferSink>>,
    pub outbound_sink: Option<Arc<dyn BufferSink>>,
    pub interapp_sink: Option<Arc<dyn BufferSink>>,
    /// Logging capability for the App; when unset the dispatcher current at
    /// construction is captured
    pub log_dispatch: Option<tracing::Dispatch>,
}

impl NAppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a keyed configuration set.
    ///
    /// Unknown keys are ignored; missing ones surface at App construction.
    pub fn from_map(mut sinks: HashMap<String, Arc<dyn BufferSink>>) -> Self {
        Self {
            inbound_sink: sinks.remove(BufferKind::Inbound.key()),
            outbound_sink: sinks.remove(BufferKind::Outbound.key()),
            interapp_sink: sinks.remove(BufferKind::InterApp.key()),
            log_dispatch: None,
        }
    }

    pub fn inbound_sink(mut self, sink: Arc<dyn BufferSink>) -> Self {
        self.inbound_sink = Some(sink);
        self
    }

    pub fn outbound_sink(mut self, sink: Arc<dyn BufferSink>) -> Self {
        self.outbound_sink = Some(sink);
        self
    }

    pub fn interapp_sink(mut self, sink: Arc<dyn BufferSink>) -> Self {
        self.interapp_sink = Some(sink);
        self
    }

    pub fn log_dispatch(mut self, dispatch: tracing::Dispatch) -> Self {
        self.log_dispatch = Some(dispatch);
        self
    }

    /// Check that every buffer was supplied, in declaration order
    pub fn validate(&self) -> Result<HostBuffers, NAppError> {
        let inbound = Self::require(&self.inbound_sink, BufferKind::Inbound)?;
        let outbound = Self::require(&self.outbound_sink, BufferKind::Outbound)?;
        let interapp = Self::require(&self.interapp_sink, BufferKind::InterApp)?;

        Ok(HostBuffers {
            inbound,
            outbound,
            interapp,
        })
    }

    fn require(
        sink: &Option<Arc<dyn BufferSink>>,
        kind: BufferKind,
    ) -> Result<Arc<dyn BufferSink>, NAppError> {
        sink.clone().ok_or(NAppError::MissingDependency(kind.key()))
    }
}

impl fmt::Debug for NAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NAppConfig")
            .field("inbound_sink", &self.inbound_sink.is_some())
            .field("outbound_sink", &self.outbound_sink.is_some())
            .field("interapp_sink", &self.interapp_sink.is_some())
            .field("log_dispatch", &self.log_dispatch.is_some())
            .finish()
    }
}

/// Validated buffer bindings, shared by the App's run unit and all of its
/// handlers
#[derive(Clone)]
pub struct HostBuffers {
    inbound: Arc<dyn BufferSink>,
    outbound: Arc<dyn BufferSink>,
    interapp: Arc<dyn BufferSink>,
}

impl HostBuffers {
    pub fn add_to_msg_in_buffer(&self, event: KycoEvent) -> Result<(), BufferError> {
        self.inbound.add(event)
    }

    pub fn add_to_msg_out_buffer(&self, event: KycoEvent) -> Result<(), BufferError> {
        self.outbound.add(event)
    }

    pub fn add_to_app_buffer(&self, event: KycoEvent) -> Result<(), BufferError> {
        self.interapp.add(event)
    }

    pub fn add_to(&self, kind: BufferKind, event: KycoEvent) -> Result<(), BufferError> {
        match kind {
            BufferKind::Inbound => self.add_to_msg_in_buffer(event),
            BufferKind::Outbound => self.add_to_msg_out_buffer(event),
            BufferKind::InterApp => self.add_to_app_buffer(event),
        }
    }
}

impl fmt::Debug for HostBuffers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBuffers").finish_non_exhaustive()
    }
}
