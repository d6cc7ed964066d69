//! Sender trait definition.

use async_trait::async_trait;

use crate::config::SecretString;
use crate::error::NotifyError;

/// Transport that posts a serialized card to one webhook destination.
///
/// Implementations must be `Send + Sync` to work across async tasks.
/// Retry, backoff and timeouts are the sender's business; the dispatcher
/// calls `send` exactly once per destination.
///
/// # Example
///
/// ```ignore
/// use teams_notify::notify::Sender;
///
/// struct StdoutSender;
///
/// #[async_trait]
/// impl Sender for StdoutSender {
///     fn name(&self) -> &str { "stdout" }
///     async fn send(&self, _token: &SecretString, body: &str) -> Result<(), NotifyError> {
///         println!("{}", body);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Sender: Send + Sync {
    /// Name used in logs and metric labels.
    fn name(&self) -> &str;

    /// Post `body` (card JSON) to the destination identified by `token`.
    ///
    /// # Arguments
    ///
    /// * `token` - Routing token, the webhook URL with its base prefix stripped
    /// * `body` - Serialized card
    async fn send(&self, token: &SecretString, body: &str) -> Result<(), NotifyError>;
}

impl std::fmt::Debug for dyn Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender").field("name", &self.name()).finish()
    }
}
