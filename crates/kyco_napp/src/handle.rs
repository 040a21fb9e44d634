//! Hosting an App: construction, run unit and event delivery

use crate::app::NApp;
use crate::buffers::NAppConfig;
use crate::context::AppContext;
use crate::error::{HandlerFault, HandlerResult, NAppError};
use crate::event::{KycoEvent, SHUTDOWN_EVENT};
use crate::lifecycle::AppState;
use crate::listener::{DispatchCounters, DispatchStats, ListenTo, Listener};
use crate::registry::ListenerRegistry;
use crate::utils::panic_message;
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, Instrument};

/// Object-safe view of a hosted App, so a controller can keep Apps of
/// different types side by side.
#[async_trait]
pub trait HostedNApp: Send + Sync {
    fn name(&self) -> &str;

    fn state(&self) -> AppState;

    /// Start the App's run unit. Valid once, from `Created`.
    fn run(&self) -> Result<JoinHandle<()>, NAppError>;

    /// Start every listener bound to `event_name`; returns how many started
    fn deliver(&self, event_name: &str, event: Arc<KycoEvent>) -> usize;

    fn stats(&self) -> DispatchStats;

    /// Wait for the run unit to finish
    async fn wait_terminated(&self);
}

/// An App instance together with its listener registry, buffers and
/// lifecycle.
///
/// Cloning shares the same instance.
pub struct NAppHandle<A: NApp> {
    app: Arc<A>,
    registry: Arc<ListenerRegistry<A>>,
    ctx: AppContext,
    runtime: Handle,
    counters: Arc<DispatchCounters>,
}

impl<A: NApp> Clone for NAppHandle<A> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            registry: self.registry.clone(),
            ctx: self.ctx.clone(),
            runtime: self.runtime.clone(),
            counters: self.counters.clone(),
        }
    }
}

impl<A: NApp> NAppHandle<A> {
    /// Construct the App.
    ///
    /// Builds the listener registry first, then checks the buffer bindings.
    /// Must be called from within a tokio runtime, which hosts every unit the
    /// App later starts.
    pub fn new(app: A, config: NAppConfig) -> Result<Self, NAppError> {
        let runtime = Handle::try_current().map_err(|_| NAppError::NoRuntime)?;

        let mut listeners = A::listeners();
        listeners.push(shutdown_listener::<A>());
        let registry = ListenerRegistry::build(listeners)?;

        let buffers = config.validate()?;

        let dispatch = config
            .log_dispatch
            .clone()
            .unwrap_or_else(|| tracing::dispatcher::get_default(|current| current.clone()));
        let ctx = AppContext::new(app.name(), buffers, dispatch);

        ctx.in_scope(|| {
            info!(
                "🔌 {} {} instantiated with {} listener(s) on {} event(s)",
                kind(&app),
                ctx.name(),
                registry.listener_count(),
                registry.len()
            );
        });

        Ok(Self {
            app: Arc::new(app),
            registry: Arc::new(registry),
            ctx,
            runtime,
            counters: Arc::new(DispatchCounters::default()),
        })
    }

    pub fn app(&self) -> &Arc<A> {
        &self.app
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn registry(&self) -> &ListenerRegistry<A> {
        &self.registry
    }

    pub fn name(&self) -> &str {
        self.ctx.name()
    }

    pub fn state(&self) -> AppState {
        self.ctx.state()
    }

    pub fn stats(&self) -> DispatchStats {
        self.counters.snapshot()
    }

    /// Start the run unit: `setup`, then `execute`.
    ///
    /// The returned task finishes when `execute` returns; the state is then
    /// `Terminated`. Failures and panics of `setup`/`execute` are logged and
    /// still end in `Terminated`.
    pub fn run(&self) -> Result<JoinHandle<()>, NAppError> {
        self.ctx.lifecycle().start()?;
        self.ctx
            .in_scope(|| info!("🚀 Running {} {}", kind(self.app.as_ref()), self.ctx.name()));

        let app = self.app.clone();
        let ctx = self.ctx.clone();
        let span = ctx.span().clone();
        let dispatch = ctx.log_dispatch().clone();

        let unit = async move {
            if let Err(fault) = run_phases(&app, &ctx).await {
                error!("❌ {} stopped with a fault: {}", ctx.name(), fault);
            }
            ctx.lifecycle().advance(AppState::Terminated);
            info!("🏁 {} terminated", ctx.name());
        };

        Ok(self.runtime.spawn(unit.instrument(span).with_subscriber(dispatch)))
    }

    /// Start every listener bound to `event_name` with `event`.
    ///
    /// Returns once the units are started, with how many were started. Never
    /// waits for, or reports on, their completion.
    pub fn deliver(&self, event_name: &str, event: impl Into<Arc<KycoEvent>>) -> usize {
        let event = event.into();
        self.ctx.in_scope(|| {
            self.registry
                .dispatch(&self.runtime, &self.app, &self.ctx, event_name, event, &self.counters)
        })
    }

    /// Deliver under the event's own name
    pub fn emit(&self, event: KycoEvent) -> usize {
        let event = Arc::new(event);
        let name = event.name.clone();
        self.deliver(name.as_str(), event)
    }

    /// Deliver the reserved shutdown event
    pub fn request_shutdown(&self) -> usize {
        self.deliver(SHUTDOWN_EVENT, KycoEvent::shutdown())
    }

    /// Wait for the run unit to finish
    pub async fn wait_terminated(&self) {
        self.ctx.lifecycle().reached(AppState::Terminated).await;
    }
}

#[async_trait]
impl<A: NApp> HostedNApp for NAppHandle<A> {
    fn name(&self) -> &str {
        NAppHandle::name(self)
    }

    fn state(&self) -> AppState {
        NAppHandle::state(self)
    }

    fn run(&self) -> Result<JoinHandle<()>, NAppError> {
        NAppHandle::run(self)
    }

    fn deliver(&self, event_name: &str, event: Arc<KycoEvent>) -> usize {
        NAppHandle::deliver(self, event_name, event)
    }

    fn stats(&self) -> DispatchStats {
        NAppHandle::stats(self)
    }

    async fn wait_terminated(&self) {
        NAppHandle::wait_terminated(self).await
    }
}

async fn run_phases<A: NApp>(app: &Arc<A>, ctx: &AppContext) -> HandlerResult {
    guarded(app.setup(ctx)).await?;
    if ctx.lifecycle().advance(AppState::Executing).is_some() {
        info!("⚙️ {} set up, executing", ctx.name());
    }
    guarded(app.execute(ctx)).await
}

async fn guarded<F>(phase: F) -> HandlerResult
where
    F: std::future::Future<Output = HandlerResult>,
{
    match AssertUnwindSafe(phase).catch_unwind().await {
        Ok(result) => result,
        Err(panic_info) => Err(HandlerFault::Panicked(panic_message(panic_info.as_ref()))),
    }
}

/// Framework listener every App gets for the reserved shutdown event
fn shutdown_listener<A: NApp>() -> Listener<A> {
    ListenTo::new(SHUTDOWN_EVENT)
        .handler(|app: Arc<A>, ctx: AppContext, _event: Arc<KycoEvent>| async move {
            if let Some(previous) = ctx.lifecycle().advance(AppState::ShuttingDown) {
                info!("🛑 {} shutting down (was {})", ctx.name(), previous);
            }
            app.shutdown(&ctx).await
        })
        .named("shutdown_handler")
}

fn kind<A: NApp>(app: &A) -> &'static str {
    if app.is_core() {
        "Core App"
    } else {
        "App"
    }
}
