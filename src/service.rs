//! Notification handler for the `MICROSOFT_TEAMS` notification type.
//!
//! Ties the card builder to the dispatcher: one card per notification,
//! delivered to every webhook listed in `to`.

use std::sync::Arc;

use serde::Deserialize;

use crate::card::{Card, CardBuilder};
use crate::config::Config;
use crate::error::MetadataError;
use crate::metadata::EventMetadata;
use crate::notify::{DeliveryResult, Dispatcher, TeamsWebhookSender};

/// Notification type handled by [`TeamsNotificationService`].
pub const NOTIFICATION_TYPE: &str = "MICROSOFT_TEAMS";

/// A notification addressed to Teams webhooks.
///
/// `message` and `summary` arrive already rendered by the templating layer.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type")]
    pub notification_type: String,
    /// Full webhook URLs.
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub metadata: EventMetadata,
}

impl Notification {
    /// Parse and validate a notification from JSON.
    ///
    /// # Errors
    /// Returns [`MetadataError::Invalid`] on malformed JSON or mistyped metadata.
    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(json).map_err(|e| MetadataError::Invalid(e.to_string()))
    }
}

impl std::fmt::Debug for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Webhook URLs are secrets
        f.debug_struct("Notification")
            .field("notification_type", &self.notification_type)
            .field("to_count", &self.to.len())
            .field("summary", &self.summary)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Builds and delivers Teams cards for notifications.
#[derive(Debug)]
pub struct TeamsNotificationService {
    builder: CardBuilder,
    dispatcher: Dispatcher,
}

impl TeamsNotificationService {
    pub fn new(builder: CardBuilder, dispatcher: Dispatcher) -> Self {
        Self {
            builder,
            dispatcher,
        }
    }

    /// Wire a service from configuration using the HTTP sender.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `client` - HTTP client; its timeout bounds each request
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        let sender = TeamsWebhookSender::with_options(
            "teams".to_string(),
            config.sender.endpoint.clone(),
            config.sender.max_retries,
            client,
        );
        let dispatcher = Dispatcher::with_base_url(Arc::new(sender), config.webhook_base_url.clone());

        Self::new(CardBuilder::new(config.card.clone()), dispatcher)
    }

    /// Whether this service handles notifications of `notification_type`.
    pub fn supports_type(&self, notification_type: &str) -> bool {
        notification_type.eq_ignore_ascii_case(NOTIFICATION_TYPE)
    }

    pub fn build_card(&self, notification: &Notification) -> Card {
        self.builder.build(
            &notification.message,
            &notification.summary,
            &notification.metadata,
        )
    }

    pub async fn deliver<S>(&self, destinations: &[S], card: &Card) -> Vec<DeliveryResult>
    where
        S: AsRef<str> + Sync,
    {
        self.dispatcher.dispatch(destinations, card).await
    }

    /// Build one card and send it to every webhook in `notification.to`.
    pub async fn handle(&self, notification: &Notification) -> Vec<DeliveryResult> {
        tracing::info!(
            destination_count = notification.to.len(),
            execution_name = ?notification.metadata.execution_name,
            "Sending Microsoft Teams notification"
        );

        let card = self.build_card(notification);
        self.deliver(&notification.to, &card).await
    }
}
