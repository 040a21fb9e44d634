//! Event name → listeners index, built once per App instance

use crate::context::AppContext;
use crate::error::NAppError;
use crate::event::{EventName, KycoEvent};
use crate::listener::{DispatchCounters, Listener};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

/// Read-only index of an App's listeners.
///
/// A listener declared for several names is shared (same `Arc`) by every
/// entry it appears in. There is no way to add or remove listeners once the
/// registry is built, so concurrent readers need no locking.
pub struct ListenerRegistry<A> {
    listeners: HashMap<EventName, SmallVec<[Arc<Listener<A>>; 4]>>,
    listener_count: usize,
}

impl<A> ListenerRegistry<A> {
    /// Index `listeners` by every name they declare.
    ///
    /// Fails on a blank event name.
    pub fn build<I>(listeners: I) -> Result<Self, NAppError>
    where
        I: IntoIterator<Item = Listener<A>>,
    {
        let mut index: HashMap<EventName, SmallVec<[Arc<Listener<A>>; 4]>> = HashMap::new();
        let mut listener_count = 0;

        for listener in listeners {
            if let Some(blank) = listener.events().iter().find(|name| name.is_blank()) {
                return Err(NAppError::Definition(format!(
                    "{} declares a blank event name {:?}",
                    listener.name(),
                    blank.as_str()
                )));
            }

            let listener = Arc::new(listener);
            for event_name in listener.events() {
                index
                    .entry(event_name.clone())
                    .or_insert_with(SmallVec::new)
                    .push(listener.clone());
            }
            listener_count += 1;
        }

        Ok(Self {
            listeners: index,
            listener_count,
        })
    }

    /// Listeners bound to `event_name`, empty when there are none
    pub fn handlers_for(&self, event_name: &str) -> &[Arc<Listener<A>>] {
        self.listeners
            .get(event_name)
            .map(|listeners| listeners.as_slice())
            .unwrap_or(&[])
    }

    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers_for(event_name).len()
    }

    pub fn contains(&self, event_name: &str) -> bool {
        self.listeners.contains_key(event_name)
    }

    /// All names with at least one listener, in no particular order
    pub fn event_names(&self) -> impl Iterator<Item = &EventName> {
        self.listeners.keys()
    }

    /// Number of distinct event names
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of listeners indexed, each counted once
    pub fn listener_count(&self) -> usize {
        self.listener_count
    }
}

impl<A: Send + Sync + 'static> ListenerRegistry<A> {
    /// Start every listener bound to `event_name`.
    ///
    /// Returns how many units were started. An unknown name is a no-op.
    pub fn dispatch(
        &self,
        runtime: &Handle,
        app: &Arc<A>,
        ctx: &AppContext,
        event_name: &str,
        event: Arc<KycoEvent>,
        counters: &Arc<DispatchCounters>,
    ) -> usize {
        let listeners = self.handlers_for(event_name);
        if listeners.is_empty() {
            debug!("No listeners for event: {}", event_name);
            return 0;
        }

        debug!("📤 Dispatching {} to {} listener(s)", event_name, listeners.len());
        for listener in listeners {
            listener.invoke(runtime, app.clone(), ctx.clone(), event.clone(), counters);
        }
        listeners.len()
    }
}

impl<A> fmt::Debug for ListenerRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<(&str, usize)> = self
            .listeners
            .iter()
            .map(|(name, listeners)| (name.as_str(), listeners.len()))
            .collect();
        keys.sort_unstable();
        f.debug_struct("ListenerRegistry")
            .field("listeners", &keys)
            .field("listener_count", &self.listener_count)
            .finish()
    }
}
