//! Signal handling for graceful controller shutdown.

use tokio::signal;
use tracing::info;

/// Waits for a termination signal (SIGINT or SIGTERM on Unix, Ctrl+C on
/// Windows).
pub async fn wait_for_shutdown_signal() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(windows)]
    signal::ctrl_c().await?;

    info!("📡 Received shutdown signal - initiating graceful shutdown");
    Ok(())
}
