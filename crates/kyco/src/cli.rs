//! Command-line interface handling for the Kyco controller.
//!
//! Arguments override the matching settings of the configuration file.

use crate::config::AppConfig;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the controller name
    pub name: Option<String>,
}

impl CliArgs {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses an explicit argument list, first item being the binary name.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    /// Overrides the matching settings of a loaded configuration
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(log_level) = &self.log_level {
            config.logging.level = log_level.clone();
        }

        if self.json_logs {
            config.logging.json_format = true;
        }

        if let Some(name) = &self.name {
            config.controller.name = name.clone();
        }
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("kyco.toml")),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            name: matches.get_one::<String>("name").cloned(),
        }
    }
}

fn command() -> Command {
    Command::new("Kyco Controller")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Event-driven controller hosting network apps")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("kyco.toml"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .help("Controller instance name"),
        )
}
