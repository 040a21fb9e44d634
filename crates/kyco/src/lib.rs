//! # Kyco Controller - Main Entry Point
//!
//! Reference host for network apps built on `kyco_napp`. This entry point
//! handles CLI parsing, configuration loading, logging setup and the
//! application lifecycle.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! kyco
//!
//! # Specify custom configuration
//! kyco --config lab.toml
//!
//! # Override specific settings
//! kyco --name of-lab --log-level debug
//!
//! # JSON logging for production
//! kyco --json-logs
//! ```
//!
//! ## Configuration
//!
//! The controller loads configuration from a TOML file (default: `kyco.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! On SIGINT (Ctrl+C) or SIGTERM every hosted App receives the reserved
//! shutdown event; the controller then waits for each App to terminate.

use tracing::{error, info};

pub mod app;
pub mod apps;
pub mod bus;
pub mod cli;
pub mod config;
pub mod logging;
pub mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Main entry point for the Kyco controller.
///
/// Called from `main` inside the tokio runtime. Exits the process with code 1
/// on startup or runtime errors.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let created = !args.config_path.exists();

    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration {}: {e}", args.config_path.display());
            std::process::exit(1);
        }
    };

    // Logging comes first: Apps capture the active subscriber when built
    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    if created {
        info!("📝 Created default configuration file: {}", args.config_path.display());
    }
    info!("🔧 Configuration loaded from: {}", args.config_path.display());

    match Application::new(config) {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Loads the configuration file once and applies the CLI overrides
pub async fn load_config(args: &CliArgs) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load_from_file(&args.config_path).await?;
    args.apply_overrides(&mut config);
    Ok(config)
}

pub use config::{ControllerSettings, LoggingSettings};
