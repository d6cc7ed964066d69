//! Microsoft Teams incoming-webhook sender.
//!
//! Implements the `Sender` trait by posting card JSON to
//! `{endpoint}{routing_token}` with exponential backoff retry.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::Instrument;

use crate::config::SecretString;
use crate::error::NotifyError;
use crate::notify::{DEFAULT_WEBHOOK_BASE_URL, Sender, backoff_delay};

/// Backoff base delay between attempts.
const TEAMS_BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Maximum backoff delay between attempts.
const TEAMS_BACKOFF_MAX: Duration = Duration::from_secs(5);

/// Default number of attempts per destination.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Sends cards to Microsoft Teams incoming webhooks.
///
/// # Retry Policy
///
/// - **5xx errors**: Retry (connector temporarily unavailable)
/// - **Network errors**: Retry (timeout, connection refused)
/// - **4xx errors**: Do NOT retry (bad token, malformed card)
///
/// # Example
///
/// ```ignore
/// let sender = TeamsWebhookSender::new("teams".to_string(), client);
/// sender.send(&token, &card.to_json()?).await?;
/// ```
pub struct TeamsWebhookSender {
    name: String,
    /// HTTP client (shared, connection pooling). Carries the request timeout.
    client: reqwest::Client,
    /// Base URL the routing token is appended to.
    endpoint: String,
    max_retries: u32,
}

impl TeamsWebhookSender {
    /// Create a sender posting to the public Teams webhook endpoint.
    pub fn new(name: String, client: reqwest::Client) -> Self {
        Self::with_options(
            name,
            DEFAULT_WEBHOOK_BASE_URL.to_string(),
            DEFAULT_MAX_RETRIES,
            client,
        )
    }

    /// Create a sender with a custom endpoint and attempt count.
    ///
    /// # Arguments
    ///
    /// * `name` - Name used in logs and metrics
    /// * `endpoint` - Base URL the routing token is appended to
    /// * `max_retries` - Attempts per send, at least 1
    /// * `client` - HTTP client (shared for connection pooling)
    pub fn with_options(
        name: String,
        endpoint: String,
        max_retries: u32,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name,
            client,
            endpoint,
            max_retries: max_retries.max(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn record_error(&self) {
        metrics::counter!(
            "teams_notify_errors_total",
            "sender" => self.name.clone()
        )
        .increment(1);
    }
}

#[async_trait]
impl Sender for TeamsWebhookSender {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, token: &SecretString, body: &str) -> Result<(), NotifyError> {
        let span = tracing::info_span!("send_teams", sender = %self.name);

        async {
            let url = format!("{}{}", self.endpoint, token.expose());

            for attempt in 0..self.max_retries {
                match self
                    .client
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.to_string())
                    .send()
                    .await
                {
                    Ok(response) if response.status().is_success() => {
                        tracing::info!("Card sent successfully");
                        metrics::counter!(
                            "teams_notify_sent_total",
                            "sender" => self.name.clone()
                        )
                        .increment(1);
                        return Ok(());
                    }
                    Ok(response) if response.status().is_client_error() => {
                        let status = response.status();
                        tracing::error!(
                            status = %status,
                            "Teams returned client error, not retrying"
                        );
                        self.record_error();
                        return Err(NotifyError::SendFailed(format!("client error: {}", status)));
                    }
                    Ok(response) => {
                        tracing::warn!(
                            attempt = attempt,
                            status = %response.status(),
                            "Teams returned server error, retrying"
                        );
                    }
                    Err(e) => {
                        // reqwest errors embed the URL, which carries the token
                        let e = e.without_url();
                        tracing::warn!(
                            attempt = attempt,
                            error = %e,
                            "Failed to send to Teams, retrying"
                        );
                    }
                }

                if attempt < self.max_retries - 1 {
                    let delay = backoff_delay(attempt, TEAMS_BACKOFF_BASE, TEAMS_BACKOFF_MAX);
                    tracing::debug!(delay_ms = delay.as_millis(), "Waiting before retry");
                    tokio::time::sleep(delay).await;
                }
            }

            tracing::error!(
                max_retries = self.max_retries,
                "Failed to send card after all retries"
            );
            self.record_error();
            Err(NotifyError::MaxRetriesExceeded)
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for TeamsWebhookSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamsWebhookSender")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
