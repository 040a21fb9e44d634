//! Logging system setup and configuration.
//!
//! Installs the process-wide tracing subscriber. Hosted Apps capture it at
//! construction, so this must run before any App is built.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the logging system with the specified configuration.
///
/// `RUST_LOG` takes precedence over the configured level. `json_format`
/// forces JSON output regardless of the config file.
pub fn setup_logging(
    config: &LoggingSettings,
    json_format: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if json_format || config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()?;
    }

    info!("🔧 Logging initialized with level: {}", log_level);
    Ok(())
}

/// Displays the startup banner using proper logging.
pub fn display_banner(controller_name: &str) {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("╔══════════════════════════════════════════╗");
    info!("║             🛰️  KYCO CONTROLLER            ║");
    info!("║                  v{:<10}             ║", version);
    info!("║                                          ║");
    info!("║  🔌 Network Apps  📤 Fire-and-forget     ║");
    info!("║                                          ║");
    info!("╚══════════════════════════════════════════╝");
    info!("🏷️ Controller instance: {}", controller_name);
}
