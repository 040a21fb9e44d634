//! Main application logic and lifecycle management.
//!
//! The `Application` wires the host buffers, builds the hosted Apps, runs
//! them and drives the graceful shutdown once a signal arrives.

use crate::apps::{EchoApp, HeartbeatApp};
use crate::bus::{drain, AppBus};
use crate::config::AppConfig;
use crate::logging::display_banner;
use crate::signals::wait_for_shutdown_signal;
use futures::future::join_all;
use kyco_napp::{channel_sink, BufferKind, HostedNApp, KycoEvent, NAppConfig, NAppHandle};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Receiving ends of the three host buffers
struct BufferReceivers {
    inbound: UnboundedReceiver<KycoEvent>,
    outbound: UnboundedReceiver<KycoEvent>,
    interapp: UnboundedReceiver<KycoEvent>,
}

/// Main application struct.
///
/// Owns the configuration, the hosted Apps and the receiving ends of the
/// buffers they write into.
pub struct Application {
    config: AppConfig,
    bus: AppBus,
    buffers: BufferReceivers,
}

impl Application {
    /// Creates a new application instance from a loaded configuration.
    ///
    /// Validates settings, wires the host buffers and builds the hosted Apps.
    /// Logging must already be set up: Apps capture the active subscriber.
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        display_banner(&config.controller.name);

        let (inbound_tx, inbound) = unbounded_channel();
        let (outbound_tx, outbound) = unbounded_channel();
        let (interapp_tx, interapp) = unbounded_channel();

        let napp_config = NAppConfig::new()
            .inbound_sink(channel_sink(BufferKind::Inbound, inbound_tx))
            .outbound_sink(channel_sink(BufferKind::Outbound, outbound_tx))
            .interapp_sink(channel_sink(BufferKind::InterApp, interapp_tx));

        let heartbeat = NAppHandle::new(
            HeartbeatApp::new(config.controller.heartbeat_interval()),
            napp_config.clone(),
        )?;
        let echo = NAppHandle::new(EchoApp::new(), napp_config)?;

        let apps: Vec<Arc<dyn HostedNApp>> = vec![Arc::new(heartbeat), Arc::new(echo)];

        Ok(Self {
            config,
            bus: AppBus::new(apps),
            buffers: BufferReceivers {
                inbound,
                outbound,
                interapp,
            },
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle on the hosted Apps; stays valid after `run` consumed `self`
    pub fn bus(&self) -> AppBus {
        self.bus.clone()
    }

    /// Runs until a termination signal arrives, then shuts down gracefully.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        self.run_until(wait_for_shutdown_signal()).await
    }

    /// Runs until `shutdown` resolves, then shuts down gracefully.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = Result<(), Box<dyn std::error::Error>>>,
    {
        info!("🌟 Starting Kyco controller {}", self.config.controller.name);
        self.log_configuration_summary();

        let Self {
            config,
            bus,
            buffers,
        } = self;

        let forwarder = tokio::spawn(bus.clone().forward(buffers.interapp));
        let inbound_drain = tokio::spawn(drain(BufferKind::Inbound, buffers.inbound));
        let outbound_drain = tokio::spawn(drain(BufferKind::Outbound, buffers.outbound));

        let mut run_units: Vec<(String, JoinHandle<()>)> = Vec::new();
        for app in bus.apps() {
            match app.run() {
                Ok(unit) => run_units.push((app.name().to_string(), unit)),
                Err(e) => error!("❌ Failed to run {}: {}", app.name(), e),
            }
        }

        info!("✅ Kyco is now running with {} app(s)", run_units.len());
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        let signal_result = shutdown.await;
        if let Err(e) = &signal_result {
            error!("❌ Shutdown trigger failed: {}", e);
        }

        // Phase 1: every App gets the shutdown event
        info!("📡 Phase 1: Notifying apps...");
        bus.shutdown_all();

        // Phase 2: wait for the run units
        info!("⏳ Phase 2: Waiting for apps to terminate...");
        let timeout = config.controller.shutdown_timeout();
        let waits = bus.apps().iter().map(|app| {
            let app = app.clone();
            async move {
                if tokio::time::timeout(timeout, app.wait_terminated()).await.is_err() {
                    warn!(
                        "⏰ {} did not terminate within {:?} (state: {})",
                        app.name(),
                        timeout,
                        app.state()
                    );
                }
            }
        });
        join_all(waits).await;

        for (name, unit) in run_units {
            if unit.is_finished() {
                if let Err(e) = unit.await {
                    error!("❌ Run unit of {} failed: {}", name, e);
                }
            } else {
                unit.abort();
            }
        }

        // Phase 3: stop the buffer consumers
        info!("🧹 Phase 3: Stopping buffer consumers...");
        forwarder.abort();
        inbound_drain.abort();
        outbound_drain.abort();

        log_final_statistics(&bus);
        info!("✅ Kyco controller {} shutdown complete", config.controller.name);

        signal_result
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  🏷️ Name: {}", self.config.controller.name);
        info!(
            "  ⏱️ Shutdown timeout: {}s",
            self.config.controller.shutdown_timeout_secs
        );
        info!(
            "  💓 Heartbeat interval: {}ms",
            self.config.controller.heartbeat_interval_ms
        );
        for app in self.bus.apps() {
            info!("  🔌 {} ({})", app.name(), app.state());
        }
    }
}

/// Logs final statistics during shutdown.
fn log_final_statistics(bus: &AppBus) {
    info!("📊 Final Statistics:");
    for app in bus.apps() {
        let stats = app.stats();
        info!(
            "  - {}: {} | {} started, {} completed, {} faulted, {} in flight",
            app.name(),
            app.state(),
            stats.started,
            stats.completed,
            stats.faulted,
            stats.in_flight()
        );
    }
}
