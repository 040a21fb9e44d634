//! # Kyco NApp
//!
//! Listener registration, concurrent event dispatch and lifecycle management
//! for the network apps (NApps) hosted by the Kyco controller.
//!
//! ## Key Features
//!
//! - **Declarative listeners**: each App type lists which events its methods
//!   react to, once, in [`NApp::listeners`]
//! - **One registry per instance**: built at construction, read-only afterwards
//! - **Fire-and-forget dispatch**: every matching listener runs as its own task;
//!   a slow, blocking or failing listener never stalls the controller or the
//!   other listeners
//! - **Lifecycle**: `Created → SettingUp → Executing → ShuttingDown →
//!   Terminated`, with shutdown triggered by [`SHUTDOWN_EVENT`]
//!
//! ## Architecture
//!
//! - **ListenTo / Listener**: binding of a handler to one or more event names
//! - **ListenerRegistry**: event name → listeners index
//! - **NAppHandle**: an App instance with its registry, buffers and lifecycle
//! - **NAppConfig / HostBuffers**: the three host-supplied buffer sinks
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kyco_napp::*;
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! impl Echo {
//!     async fn on_ping(&self, ctx: &AppContext, _event: &KycoEvent) -> HandlerResult {
//!         ctx.buffers().add_to_app_buffer(KycoEvent::new("Pong").with_source(ctx.name()))?;
//!         Ok(())
//!     }
//! }
//!
//! #[async_trait]
//! impl NApp for Echo {
//!     fn name(&self) -> &str { "echo" }
//!     fn listeners() -> Vec<Listener<Self>> { vec![listen_to!("Ping" => on_ping)] }
//!     async fn setup(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
//!     async fn execute(&self, ctx: &AppContext) -> HandlerResult {
//!         ctx.until_shutdown().await;
//!         Ok(())
//!     }
//!     async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult { Ok(()) }
//! }
//!
//! # async fn example() -> Result<(), NAppError> {
//! let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
//! let config = NAppConfig::new()
//!     .inbound_sink(channel_sink(BufferKind::Inbound, tx.clone()))
//!     .outbound_sink(channel_sink(BufferKind::Outbound, tx.clone()))
//!     .interapp_sink(channel_sink(BufferKind::InterApp, tx));
//!
//! let echo = NAppHandle::new(Echo, config)?;
//! echo.run()?;
//! echo.deliver("Ping", KycoEvent::new("Ping"));
//! echo.request_shutdown();
//! echo.wait_terminated().await;
//! # Ok(())
//! # }
//! ```
//!
//! Event names are matched exactly. Pattern subscriptions, if any, are the
//! host bus's concern: it resolves them to concrete names before delivering.

pub mod app;
pub mod buffers;
pub mod context;
pub mod error;
pub mod event;
pub mod handle;
pub mod lifecycle;
pub mod listener;
pub mod macros;
pub mod registry;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use app::NApp;
pub use buffers::{channel_sink, BufferKind, BufferSink, HostBuffers, NAppConfig};
pub use context::AppContext;
pub use error::{BufferError, HandlerFault, HandlerResult, NAppError};
pub use event::{EventName, KycoEvent, SHUTDOWN_EVENT};
pub use handle::{HostedNApp, NAppHandle};
pub use lifecycle::{AppState, Lifecycle};
pub use listener::{DispatchCounters, DispatchStats, ListenTo, Listener};
pub use registry::ListenerRegistry;

pub use async_trait::async_trait;

/// Version information
pub const KYCO_NAPP_VERSION: &str = env!("CARGO_PKG_VERSION");
