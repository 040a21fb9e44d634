//! Per-App context handed to lifecycle methods and listeners

use crate::buffers::HostBuffers;
use crate::lifecycle::{AppState, Lifecycle};
use std::sync::Arc;
use tracing::{Dispatch, Span};

/// Everything an App's units of execution share: its name, the host buffers,
/// the lifecycle and the injected logging capability.
///
/// Cloning is cheap; every spawned handler gets its own copy.
#[derive(Clone, Debug)]
pub struct AppContext {
    name: Arc<str>,
    buffers: HostBuffers,
    lifecycle: Arc<Lifecycle>,
    dispatch: Dispatch,
    span: Span,
}

impl AppContext {
    pub(crate) fn new(name: &str, buffers: HostBuffers, dispatch: Dispatch) -> Self {
        let span = tracing::dispatcher::with_default(&dispatch, || {
            tracing::info_span!("napp", app = %name)
        });

        Self {
            name: Arc::from(name),
            buffers,
            lifecycle: Arc::new(Lifecycle::new()),
            dispatch,
            span,
        }
    }

    /// Name of the App owning this context
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host buffers the App writes into
    pub fn buffers(&self) -> &HostBuffers {
        &self.buffers
    }

    pub fn state(&self) -> AppState {
        self.lifecycle.state()
    }

    /// True once the reserved shutdown event has been delivered
    pub fn shutdown_requested(&self) -> bool {
        self.state() >= AppState::ShuttingDown
    }

    /// Resolve once shutdown has been requested.
    ///
    /// Meant for `execute` loops that want to stop cooperatively.
    pub async fn until_shutdown(&self) {
        self.lifecycle.reached(AppState::ShuttingDown).await;
    }

    /// Logging capability injected at construction
    pub fn log_dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Span tagging everything this App logs
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Run `f` with this App's dispatcher and span active
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, || self.span.in_scope(f))
    }

    pub(crate) fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }
}
