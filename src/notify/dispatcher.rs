//! Fan-out of one card to every destination webhook.

use std::sync::Arc;

use tracing::Instrument;

use super::Sender;
use crate::card::Card;
use crate::config::SecretString;
use crate::error::NotifyError;

/// Prefix of every Microsoft Teams incoming-webhook URL.
pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://outlook.office.com/webhook/";

/// Outcome of delivering a card to one destination.
#[derive(Debug)]
pub struct DeliveryResult {
    /// Position of the destination in the dispatched list.
    pub index: usize,
    /// Full destination URL (redacted in logs).
    pub destination: SecretString,
    pub outcome: Result<(), NotifyError>,
}

impl DeliveryResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Strip `base_url` from a webhook URL, leaving the routing token.
///
/// # Errors
/// [`NotifyError::InvalidDestination`] when the URL lacks the prefix or
/// nothing follows it.
pub fn routing_token(destination: &str, base_url: &str) -> Result<SecretString, NotifyError> {
    match destination.strip_prefix(base_url) {
        Some(token) if !token.is_empty() => Ok(SecretString::new(token.to_string())),
        Some(_) => Err(NotifyError::InvalidDestination(
            "webhook URL has no routing token".to_string(),
        )),
        None => Err(NotifyError::InvalidDestination(format!(
            "webhook URL does not start with {}",
            base_url
        ))),
    }
}

/// Sends a card to a list of webhook URLs through a [`Sender`].
///
/// Each destination is independent: a malformed URL or a failed send is
/// recorded in that destination's [`DeliveryResult`] and the others proceed.
pub struct Dispatcher {
    sender: Arc<dyn Sender>,
    base_url: String,
}

impl Dispatcher {
    /// Create a dispatcher for Teams webhook URLs.
    pub fn new(sender: Arc<dyn Sender>) -> Self {
        Self::with_base_url(sender, DEFAULT_WEBHOOK_BASE_URL)
    }

    /// Create a dispatcher that strips a custom base prefix.
    pub fn with_base_url(sender: Arc<dyn Sender>, base_url: impl Into<String>) -> Self {
        Self {
            sender,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Deliver `card` to every destination, concurrently.
    ///
    /// Returns one result per destination, in input order.
    pub async fn dispatch<S>(&self, destinations: &[S], card: &Card) -> Vec<DeliveryResult>
    where
        S: AsRef<str> + Sync,
    {
        let span = tracing::info_span!(
            "dispatch_card",
            correlation_id = %card.correlation_id(),
            destination_count = destinations.len(),
            sender = %self.sender.name()
        );

        async {
            let body = match card.to_json() {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize card");
                    return destinations
                        .iter()
                        .enumerate()
                        .map(|(index, destination)| DeliveryResult {
                            index,
                            destination: SecretString::new(destination.as_ref().to_string()),
                            outcome: Err(NotifyError::Serialization(e.to_string())),
                        })
                        .collect::<Vec<_>>();
                }
            };
            tracing::trace!(body_len = body.len(), "Card serialized");

            let body = body.as_str();
            let sends = destinations
                .iter()
                .enumerate()
                .map(|(index, destination)| async move {
                    let destination = destination.as_ref();
                    let outcome = match routing_token(destination, &self.base_url) {
                        Ok(token) => self.sender.send(&token, body).await,
                        Err(e) => {
                            metrics::counter!(
                                "teams_notify_invalid_destinations_total",
                                "sender" => self.sender.name().to_string()
                            )
                            .increment(1);
                            Err(e)
                        }
                    };
                    DeliveryResult {
                        index,
                        destination: SecretString::new(destination.to_string()),
                        outcome,
                    }
                });

            let results = futures_util::future::join_all(sends).await;

            for result in &results {
                match &result.outcome {
                    Ok(()) => {
                        tracing::debug!(index = result.index, "Card delivered");
                    }
                    Err(e) => {
                        tracing::error!(
                            index = result.index,
                            error = %e,
                            "Failed to deliver card"
                        );
                    }
                }
            }

            results
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("sender", &self.sender.name())
            .field("base_url", &self.base_url)
            .finish()
    }
}
