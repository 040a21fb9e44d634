//! Minimal event bus of the controller.
//!
//! Events an App writes to the inter-app buffer are delivered to every
//! hosted App by exact name. The inbound and outbound buffers have no
//! network behind them here; their events are only logged.

use kyco_napp::{BufferKind, HostedNApp, KycoEvent, SHUTDOWN_EVENT};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

/// The set of hosted Apps, addressed as a whole
#[derive(Clone, Default)]
pub struct AppBus {
    apps: Arc<Vec<Arc<dyn HostedNApp>>>,
}

impl AppBus {
    pub fn new(apps: Vec<Arc<dyn HostedNApp>>) -> Self {
        Self {
            apps: Arc::new(apps),
        }
    }

    pub fn apps(&self) -> &[Arc<dyn HostedNApp>] {
        &self.apps
    }

    /// Deliver `event` under its own name to every App.
    ///
    /// Returns the total number of listeners started.
    pub fn broadcast(&self, event: KycoEvent) -> usize {
        let event = Arc::new(event);
        self.apps
            .iter()
            .map(|app| app.deliver(event.name.as_str(), event.clone()))
            .sum()
    }

    /// Deliver the reserved shutdown event to every App
    pub fn shutdown_all(&self) -> usize {
        info!("🛑 Delivering {} to {} app(s)", SHUTDOWN_EVENT, self.apps.len());
        self.broadcast(KycoEvent::shutdown())
    }

    /// Forward inter-app buffer events until every sender is gone
    pub async fn forward(self, mut interapp: UnboundedReceiver<KycoEvent>) {
        while let Some(event) = interapp.recv().await {
            let name = event.name.clone();
            let source = event.source.clone();
            let started = self.broadcast(event);
            debug!(
                "🔀 {} from {} started {} listener(s)",
                name,
                source.as_deref().unwrap_or("host"),
                started
            );
        }
        debug!("🔀 Inter-app buffer closed");
    }
}

/// Log every event written to a host buffer until every sender is gone
pub async fn drain(kind: BufferKind, mut buffer: UnboundedReceiver<KycoEvent>) -> u64 {
    let mut seen = 0u64;
    while let Some(event) = buffer.recv().await {
        seen += 1;
        info!(
            "📨 {} buffer: {} from {} ({})",
            kind,
            event.name,
            event.source.as_deref().unwrap_or("host"),
            event.content
        );
    }
    seen
}
