//! Centralized error types for teams-notify using thiserror.
//!
//! Nothing in the card or dispatch path is fatal: builder input problems are
//! caught at the metadata boundary and delivery problems are reported per
//! destination.

use thiserror::Error;

/// Errors related to configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file: {0}")]
    LoadError(String),
    #[error("invalid configuration: {0}")]
    ValidationError(String),
    #[error("invalid destination #{index}: {message}")]
    InvalidDestination { index: usize, message: String },
}

/// Errors raised while validating incoming event metadata.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("invalid event metadata: {0}")]
    Invalid(String),
}

/// Errors related to delivering a card to a single destination.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid destination: {0}")]
    InvalidDestination(String),
    #[error("failed to serialize card: {0}")]
    Serialization(String),
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("max retries exceeded")]
    MaxRetriesExceeded,
}
