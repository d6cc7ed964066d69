//! Secret string wrapper that never appears in logs.

/// Wrapper for secrets that never appears in logs.
///
/// Teams webhook URLs and their routing tokens authorize posting to a
/// channel. `Debug` and `Display` always print `[REDACTED]`.
///
/// # Example
///
/// ```
/// use teams_notify::config::SecretString;
///
/// let secret = SecretString::new("tenant@group/IncomingWebhook/abc".to_string());
/// assert_eq!(format!("{:?}", secret), "[REDACTED]");
/// assert_eq!(secret.expose(), "tenant@group/IncomingWebhook/abc");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: String) -> Self {
        SecretString(s)
    }

    /// Exposes the underlying secret value.
    ///
    /// Never pass the result to logging functions.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}
