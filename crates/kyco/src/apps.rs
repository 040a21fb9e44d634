//! Demo Apps shipped with the controller.
//!
//! `heartbeat` pings its peers through the inter-app buffer on a fixed
//! interval; `echo` answers every ping with a pong and relays inbound
//! messages to the outbound buffer.

use kyco_napp::{async_trait, listen_to, AppContext, HandlerResult, KycoEvent, Listener, NApp};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

pub const PING: &str = "Ping";
pub const PONG: &str = "Pong";
pub const MESSAGE_IN: &str = "MessageIn";

/// Answers `Ping` with `Pong`, relays `MessageIn` to the outbound buffer
#[derive(Debug, Default)]
pub struct EchoApp {
    pongs_sent: AtomicU64,
    relayed: AtomicU64,
}

impl EchoApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pongs_sent(&self) -> u64 {
        self.pongs_sent.load(Ordering::Relaxed)
    }

    pub fn relayed(&self) -> u64 {
        self.relayed.load(Ordering::Relaxed)
    }

    async fn on_ping(&self, ctx: &AppContext, event: &KycoEvent) -> HandlerResult {
        ctx.buffers().add_to_app_buffer(
            KycoEvent::new(PONG)
                .with_content(event.content.clone())
                .with_source(ctx.name()),
        )?;
        self.pongs_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn on_message_in(&self, ctx: &AppContext, event: &KycoEvent) -> HandlerResult {
        let reply = KycoEvent::new("MessageOut")
            .with_content(event.content.clone())
            .with_source(ctx.name());
        ctx.buffers().add_to_msg_out_buffer(reply)?;
        self.relayed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[async_trait]
impl NApp for EchoApp {
    fn name(&self) -> &str {
        "echo"
    }

    fn listeners() -> Vec<Listener<Self>> {
        vec![
            listen_to!(PING => on_ping),
            listen_to!(MESSAGE_IN => blocking on_message_in),
        ]
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        Ok(())
    }

    async fn execute(&self, ctx: &AppContext) -> HandlerResult {
        ctx.until_shutdown().await;
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        info!(
            "👋 echo answered {} ping(s), relayed {} message(s)",
            self.pongs_sent(),
            self.relayed()
        );
        Ok(())
    }
}

/// Core App sending a numbered `Ping` to the inter-app buffer every interval
#[derive(Debug)]
pub struct HeartbeatApp {
    interval: Duration,
    beats: AtomicU64,
    pongs: AtomicU64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Beat {
    pub seq: u64,
}

impl HeartbeatApp {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            beats: AtomicU64::new(0),
            pongs: AtomicU64::new(0),
        }
    }

    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }

    pub fn pongs(&self) -> u64 {
        self.pongs.load(Ordering::Relaxed)
    }

    async fn on_pong(&self, _ctx: &AppContext, event: &KycoEvent) -> HandlerResult {
        let beat: Beat = event.payload()?;
        self.pongs.fetch_add(1, Ordering::Relaxed);
        debug!(
            "💓 pong {} from {}",
            beat.seq,
            event.source.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }
}

#[async_trait]
impl NApp for HeartbeatApp {
    fn name(&self) -> &str {
        "heartbeat"
    }

    fn is_core(&self) -> bool {
        true
    }

    fn listeners() -> Vec<Listener<Self>> {
        vec![listen_to!(PONG => on_pong)]
    }

    async fn setup(&self, _ctx: &AppContext) -> HandlerResult {
        info!("💓 heartbeat every {:?}", self.interval);
        Ok(())
    }

    async fn execute(&self, ctx: &AppContext) -> HandlerResult {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ctx.until_shutdown() => break,
                _ = ticker.tick() => {
                    let seq = self.beats.fetch_add(1, Ordering::Relaxed) + 1;
                    let ping = KycoEvent::new(PING)
                        .with_content(json!({ "seq": seq }))
                        .with_source(ctx.name());
                    ctx.buffers().add_to_app_buffer(ping)?;
                }
            }
        }
        Ok(())
    }

    async fn shutdown(&self, _ctx: &AppContext) -> HandlerResult {
        info!("💓 heartbeat stopping after {} beat(s), {} pong(s)", self.beats(), self.pongs());
        Ok(())
    }
}
