//! Command-line interface for teams-notify using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format for log aggregation.
    Json,
}

/// Send a pipeline execution notification to Microsoft Teams webhooks.
#[derive(Parser, Debug)]
#[command(name = "teams-notify")]
#[command(version)]
#[command(about = "Send pipeline execution notifications to Microsoft Teams")]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Path to the notification JSON file.
    #[arg(short = 'n', long = "notification", required_unless_present = "validate")]
    pub notification: Option<PathBuf>,

    /// Validate configuration and exit.
    #[arg(long = "validate")]
    pub validate: bool,

    /// Print the card as JSON instead of sending it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Log format: text or json.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text, env = "LOG_FORMAT")]
    pub log_format: LogFormat,
}
