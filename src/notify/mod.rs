//! Card delivery to Microsoft Teams webhooks.
//!
//! # Architecture
//!
//! ```text
//! card.rs -> notify/dispatcher.rs -> Sender (notify/teams.rs) -> Teams
//! ```
//!
//! - **Dispatcher**: turns each webhook URL into a routing token and calls the
//!   sender once per destination, concurrently
//! - **Sender**: abstract transport; `TeamsWebhookSender` owns retry/backoff
//! - **Independent outcomes**: one failed destination never blocks another

pub mod dispatcher;
pub mod teams;
mod traits;

use std::time::Duration;

pub use dispatcher::{DEFAULT_WEBHOOK_BASE_URL, DeliveryResult, Dispatcher, routing_token};
pub use teams::{DEFAULT_MAX_RETRIES, TeamsWebhookSender};
pub use traits::Sender;

/// Calculate exponential backoff delay.
///
/// Formula: min(base * 2^attempt, max)
///
/// # Arguments
///
/// * `attempt` - Current attempt number (0-indexed)
/// * `base` - Base delay duration
/// * `max` - Maximum delay cap
pub fn backoff_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let delay = base.saturating_mul(2_u32.saturating_pow(attempt));
    std::cmp::min(delay, max)
}

#[cfg(test)]
mod tests;
