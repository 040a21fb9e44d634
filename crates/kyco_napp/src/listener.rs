//! Listener declarations and the fire-and-forget invocation wrapper
//!
//! A [`ListenTo`] declares which events a handler reacts to. Attaching the
//! handler turns it into a [`Listener`], whose [`Listener::invoke`] never runs
//! the handler inline: it starts it as a detached task and returns at once.
//!
//! ## Fault isolation
//! Handler errors and panics are caught at the task boundary, logged under the
//! App's span and counted in [`DispatchStats`]. Nothing flows back to the
//! caller of `invoke`.

use crate::context::AppContext;
use crate::error::{HandlerFault, HandlerResult, NAppError};
use crate::event::{EventName, KycoEvent};
use crate::utils::panic_message;
use futures::future::{BoxFuture, FutureExt};
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, warn, Instrument};

type AsyncHandlerFn<A> =
    dyn Fn(Arc<A>, AppContext, Arc<KycoEvent>) -> BoxFuture<'static, HandlerResult> + Send + Sync;
type BlockingHandlerFn<A> = dyn Fn(Arc<A>, AppContext, Arc<KycoEvent>) -> HandlerResult + Send + Sync;

enum Handler<A> {
    /// Runs as a tokio task
    Async(Arc<AsyncHandlerFn<A>>),
    /// Runs on the blocking pool, for handlers that may block a thread
    Blocking(Arc<BlockingHandlerFn<A>>),
}

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        match self {
            Handler::Async(f) => Handler::Async(f.clone()),
            Handler::Blocking(f) => Handler::Blocking(f.clone()),
        }
    }
}

/// Declaration of the events a handler listens to.
///
/// At least one name is always present: [`ListenTo::new`] takes the first one
/// and [`ListenTo::any_of`] rejects an empty list.
///
/// ```rust
/// use kyco_napp::ListenTo;
///
/// let decl = ListenTo::new("KycoMessageIn").and("KycoMessageOut");
/// let names: Vec<&str> = decl.events().iter().map(|e| e.as_str()).collect();
/// assert_eq!(names, ["KycoMessageIn", "KycoMessageOut"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenTo {
    events: SmallVec<[EventName; 2]>,
}

impl ListenTo {
    pub fn new(event: impl Into<EventName>) -> Self {
        let mut events = SmallVec::new();
        events.push(event.into());
        Self { events }
    }

    /// Listen to one more event
    pub fn and(mut self, event: impl Into<EventName>) -> Self {
        self.events.push(event.into());
        self
    }

    /// Build from any list of names; the list must not be empty
    pub fn any_of<I, E>(events: I) -> Result<Self, NAppError>
    where
        I: IntoIterator<Item = E>,
        E: Into<EventName>,
    {
        let events: SmallVec<[EventName; 2]> = events.into_iter().map(Into::into).collect();
        if events.is_empty() {
            return Err(NAppError::Definition(
                "a listener needs at least one event name".to_string(),
            ));
        }
        Ok(Self { events })
    }

    /// Declared names, in declaration order
    pub fn events(&self) -> &[EventName] {
        &self.events
    }

    /// Attach an async handler
    pub fn handler<A, F, Fut>(self, handler: F) -> Listener<A>
    where
        A: Send + Sync + 'static,
        F: Fn(Arc<A>, AppContext, Arc<KycoEvent>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let handler: Arc<AsyncHandlerFn<A>> =
            Arc::new(move |app: Arc<A>, ctx: AppContext, event: Arc<KycoEvent>| {
                handler(app, ctx, event).boxed()
            });
        Listener::new(self.events, Handler::Async(handler))
    }

    /// Attach a synchronous handler that is allowed to block
    pub fn blocking<A, F>(self, handler: F) -> Listener<A>
    where
        A: Send + Sync + 'static,
        F: Fn(Arc<A>, AppContext, Arc<KycoEvent>) -> HandlerResult + Send + Sync + 'static,
    {
        Listener::new(self.events, Handler::Blocking(Arc::new(handler)))
    }
}

/// A handler bound to one or more event names
pub struct Listener<A> {
    events: SmallVec<[EventName; 2]>,
    name: Arc<str>,
    handler: Handler<A>,
}

impl<A> Clone for Listener<A> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            name: self.name.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<A> fmt::Debug for Listener<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.handler {
            Handler::Async(_) => "async",
            Handler::Blocking(_) => "blocking",
        };
        f.debug_struct("Listener")
            .field("name", &self.name)
            .field("events", &self.events)
            .field("kind", &kind)
            .finish()
    }
}

impl<A> Listener<A> {
    fn new(events: SmallVec<[EventName; 2]>, handler: Handler<A>) -> Self {
        let name = events
            .iter()
            .map(EventName::as_str)
            .collect::<Vec<_>>()
            .join("|");
        Self {
            events,
            name: Arc::from(format!("listener[{name}]")),
            handler,
        }
    }

    /// Name used in log lines
    pub fn named(mut self, name: &str) -> Self {
        self.name = Arc::from(name);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared names, in declaration order
    pub fn events(&self) -> &[EventName] {
        &self.events
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self.handler, Handler::Blocking(_))
    }
}

impl<A: Send + Sync + 'static> Listener<A> {
    /// Start the handler as an independent unit of execution and return.
    ///
    /// The unit runs under the App's span and log dispatcher. Its outcome is
    /// only visible through logs and `counters`.
    pub fn invoke(
        &self,
        runtime: &Handle,
        app: Arc<A>,
        ctx: AppContext,
        event: Arc<KycoEvent>,
        counters: &Arc<DispatchCounters>,
    ) {
        counters.started.fetch_add(1, Ordering::Relaxed);

        let counters = counters.clone();
        let listener = self.name.clone();
        let span = ctx.span().clone();
        let dispatch = ctx.log_dispatch().clone();

        match &self.handler {
            Handler::Async(handler) => {
                let handler = handler.clone();
                let unit = async move {
                    let event_name = event.name.clone();
                    let outcome = AssertUnwindSafe(async move { handler(app, ctx, event).await })
                        .catch_unwind()
                        .await;
                    report(&listener, &event_name, outcome, &counters);
                };
                runtime.spawn(unit.instrument(span).with_subscriber(dispatch));
            }
            Handler::Blocking(handler) => {
                let handler = handler.clone();
                runtime.spawn_blocking(move || {
                    tracing::dispatcher::with_default(&dispatch, || {
                        let _entered = span.enter();
                        let event_name = event.name.clone();
                        let outcome = catch_unwind(AssertUnwindSafe(|| handler(app, ctx, event)));
                        report(&listener, &event_name, outcome, &counters);
                    })
                });
            }
        }
    }
}

fn report(
    listener: &str,
    event: &EventName,
    outcome: Result<HandlerResult, Box<dyn Any + Send>>,
    counters: &DispatchCounters,
) {
    match outcome {
        Ok(Ok(())) => {
            debug!("✅ {} handled {}", listener, event);
            counters.completed.fetch_add(1, Ordering::Release);
        }
        Ok(Err(fault)) => {
            warn!("⚠️ {} failed on {}: {}", listener, event, fault);
            counters.faulted.fetch_add(1, Ordering::Release);
        }
        Err(panic_info) => {
            let fault = HandlerFault::Panicked(panic_message(panic_info.as_ref()));
            error!("❌ {} crashed on {}: {}", listener, event, fault);
            counters.faulted.fetch_add(1, Ordering::Release);
        }
    }
}

/// Live dispatch counters of one App
#[derive(Debug, Default)]
pub struct DispatchCounters {
    started: AtomicU64,
    completed: AtomicU64,
    faulted: AtomicU64,
}

impl DispatchCounters {
    pub fn snapshot(&self) -> DispatchStats {
        // Finished counts first, so `in_flight` never undercounts.
        let completed = self.completed.load(Ordering::Acquire);
        let faulted = self.faulted.load(Ordering::Acquire);
        DispatchStats {
            started: self.started.load(Ordering::Acquire),
            completed,
            faulted,
        }
    }
}

/// Statistics for dispatch monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Handler units started
    pub started: u64,
    /// Units that returned `Ok`
    pub completed: u64,
    /// Units that returned an error or panicked
    pub faulted: u64,
}

impl DispatchStats {
    /// Units started but not finished yet
    pub fn in_flight(&self) -> u64 {
        self.started.saturating_sub(self.completed + self.faulted)
    }
}
