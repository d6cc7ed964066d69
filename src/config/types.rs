//! Core configuration types and loading.

use super::env::resolve_env_vars;
use super::secret::SecretString;
use super::validation::{validate_base_url, validate_non_blank};
use crate::card::CardStyle;
use crate::error::ConfigError;
use crate::notify::{DEFAULT_MAX_RETRIES, DEFAULT_WEBHOOK_BASE_URL};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/teams-notify/config.yaml";

/// Default HTTP timeout for one webhook request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for teams-notify.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// When false, notifications are accepted but never sent.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Prefix stripped from destination URLs to obtain routing tokens.
    #[serde(default = "default_webhook_base_url")]
    pub webhook_base_url: String,
    #[serde(default)]
    pub sender: SenderConfig,
    /// Card titles and protocol tags.
    #[serde(default)]
    pub card: CardStyle,
    /// Destinations used when a notification names none (supports `${ENV_VAR}`).
    #[serde(default)]
    pub destinations: Vec<String>,
}

/// HTTP sender settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SenderConfig {
    /// Base URL routing tokens are posted to.
    #[serde(default = "default_webhook_base_url")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl SenderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_webhook_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            webhook_base_url: default_webhook_base_url(),
            sender: SenderConfig::default(),
            card: CardStyle::default(),
            destinations: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_webhook_base_url() -> String {
    DEFAULT_WEBHOOK_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// # Errors
    /// Returns [`ConfigError::LoadError`] if the file cannot be read.
    /// Returns [`ConfigError::ValidationError`] if the YAML is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Validate every setting, collecting all errors.
    ///
    /// # Errors
    /// Returns a `Vec<ConfigError>` with one entry per problem found.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if let Err(e) = validate_base_url(&self.webhook_base_url) {
            errors.push(ConfigError::ValidationError(format!("webhook_base_url: {}", e)));
        }
        if let Err(e) = validate_base_url(&self.sender.endpoint) {
            errors.push(ConfigError::ValidationError(format!("sender.endpoint: {}", e)));
        }
        if self.sender.timeout_secs == 0 {
            errors.push(ConfigError::ValidationError(
                "sender.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.sender.max_retries == 0 {
            errors.push(ConfigError::ValidationError(
                "sender.max_retries must be at least 1".to_string(),
            ));
        }

        let card_fields = [
            ("card.activity_title", &self.card.activity_title),
            ("card.facts_title", &self.card.facts_title),
            ("card.event_name_label", &self.card.event_name_label),
            ("card.action_name", &self.card.action_name),
            ("card.context", &self.card.context),
            ("card.message_type", &self.card.message_type),
            ("card.action_context", &self.card.action_context),
            ("card.action_type", &self.card.action_type),
        ];
        for (field, value) in card_fields {
            if let Err(e) = validate_non_blank(field, value) {
                errors.push(ConfigError::ValidationError(e));
            }
        }

        if let Err(destination_errors) = self.resolve_destinations() {
            errors.extend(destination_errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Resolve `${VAR}` placeholders in the default destinations.
    ///
    /// # Errors
    /// Returns one [`ConfigError::InvalidDestination`] per destination that
    /// references an undefined variable or lacks the webhook base prefix.
    pub fn resolve_destinations(&self) -> Result<Vec<SecretString>, Vec<ConfigError>> {
        let mut resolved = Vec::with_capacity(self.destinations.len());
        let mut errors = Vec::new();

        for (index, destination) in self.destinations.iter().enumerate() {
            match resolve_env_vars(destination) {
                Ok(url) if url.starts_with(&self.webhook_base_url) => {
                    resolved.push(SecretString::new(url));
                }
                Ok(_) => errors.push(ConfigError::InvalidDestination {
                    index,
                    message: format!("must start with {}", self.webhook_base_url),
                }),
                Err(e) => errors.push(ConfigError::InvalidDestination {
                    index,
                    message: e.to_string(),
                }),
            }
        }

        if errors.is_empty() {
            Ok(resolved)
        } else {
            Err(errors)
        }
    }
}
