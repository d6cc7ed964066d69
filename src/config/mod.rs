//! Configuration loading and validation for teams-notify.
//!
//! This module handles loading the YAML configuration file,
//! validation, and environment variable substitution for webhook secrets.

mod env;
mod secret;
mod types;
mod validation;

pub use env::resolve_env_vars;
pub use secret::SecretString;
pub use types::{Config, DEFAULT_CONFIG_PATH, DEFAULT_TIMEOUT_SECS, SenderConfig};
