//! URL and text validation utilities.

use regex::Regex;
use std::sync::LazyLock;

/// Validates a base URL that routing tokens are appended to or stripped from.
///
/// Must be an absolute http(s) URL ending with `/`.
pub(crate) fn validate_base_url(url: &str) -> Result<(), String> {
    static BASE_URL_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^https?://[^\s/]+(/\S*)?/$").expect("valid regex"));

    if BASE_URL_REGEX.is_match(url) {
        Ok(())
    } else {
        Err(format!(
            "invalid base url '{}': must be an http(s) URL ending with '/'",
            url
        ))
    }
}

/// Validates that a presentation string is not blank.
pub(crate) fn validate_non_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", field))
    } else {
        Ok(())
    }
}
