//! Event metadata consumed by the card builder.
//!
//! Upstream producers hand over a loosely typed JSON object. It is validated
//! once here, into named optional fields, so the builder never has to guess
//! at value types. Unknown keys are ignored and `null` counts as absent.

use std::fmt;

use serde::Deserialize;

use crate::error::MetadataError;

/// Build number as emitted by the pipeline: CI systems send either an integer
/// or an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BuildNumber {
    Number(i64),
    Text(String),
}

impl fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildNumber::Number(n) => write!(f, "{}", n),
            BuildNumber::Text(s) => f.write_str(s),
        }
    }
}

/// Metadata describing one pipeline execution event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub execution_status: Option<String>,
    pub execution_description: Option<String>,
    /// Older producers send `description` instead of `executionDescription`.
    pub description: Option<String>,
    pub execution_name: Option<String>,
    pub event_name: Option<String>,
    pub execution_summary: Option<String>,
    pub build_number: Option<BuildNumber>,
    pub execution_url: Option<String>,
}

impl EventMetadata {
    /// Validate a JSON value into metadata.
    ///
    /// # Errors
    /// Returns [`MetadataError::Invalid`] if the value is not an object or a
    /// known key carries a value of the wrong type.
    pub fn from_value(value: serde_json::Value) -> Result<Self, MetadataError> {
        serde_json::from_value(value).map_err(|e| MetadataError::Invalid(e.to_string()))
    }

    /// Parse and validate metadata from a JSON document.
    ///
    /// # Errors
    /// Returns [`MetadataError::Invalid`] on malformed JSON or mistyped keys.
    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        serde_json::from_str(json).map_err(|e| MetadataError::Invalid(e.to_string()))
    }

    /// Execution description, preferring `executionDescription` over `description`.
    pub fn description(&self) -> Option<&str> {
        self.execution_description
            .as_deref()
            .or(self.description.as_deref())
    }

    /// Execution URL, if present and non-empty.
    pub fn execution_url(&self) -> Option<&str> {
        self.execution_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_all_known_keys() {
        let metadata = EventMetadata::from_value(json!({
            "executionStatus": "complete",
            "executionDescription": "Deploy to prod",
            "executionName": "deploy-prod",
            "eventName": "orca:pipeline:complete",
            "executionSummary": "ok",
            "buildNumber": 42,
            "executionUrl": "https://ci.example.com/executions/1"
        }))
        .unwrap();

        assert_eq!(metadata.execution_status.as_deref(), Some("complete"));
        assert_eq!(metadata.description(), Some("Deploy to prod"));
        assert_eq!(metadata.execution_name.as_deref(), Some("deploy-prod"));
        assert_eq!(metadata.event_name.as_deref(), Some("orca:pipeline:complete"));
        assert_eq!(metadata.execution_summary.as_deref(), Some("ok"));
        assert_eq!(metadata.build_number, Some(BuildNumber::Number(42)));
        assert_eq!(
            metadata.execution_url(),
            Some("https://ci.example.com/executions/1")
        );
    }

    #[test]
    fn missing_and_null_keys_are_absent() {
        let metadata = EventMetadata::from_value(json!({
            "executionStatus": null,
            "executionName": "build"
        }))
        .unwrap();

        assert!(metadata.execution_status.is_none());
        assert!(metadata.build_number.is_none());
        assert!(metadata.execution_url().is_none());
        assert_eq!(metadata.execution_name.as_deref(), Some("build"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let metadata = EventMetadata::from_value(json!({
            "executionName": "build",
            "application": "frontend",
            "nested": { "x": 1 }
        }))
        .unwrap();
        assert_eq!(metadata.execution_name.as_deref(), Some("build"));
    }

    #[test]
    fn build_number_accepts_string() {
        let metadata = EventMetadata::from_json_str(r#"{"buildNumber": "1.2.3-rc1"}"#).unwrap();
        let build = metadata.build_number.unwrap();
        assert_eq!(build, BuildNumber::Text("1.2.3-rc1".to_string()));
        assert_eq!(build.to_string(), "1.2.3-rc1");
    }

    #[test]
    fn build_number_integer_renders_decimal() {
        assert_eq!(BuildNumber::Number(42).to_string(), "42");
        assert_eq!(BuildNumber::Number(-7).to_string(), "-7");
    }

    #[test]
    fn description_falls_back_to_legacy_key() {
        let metadata = EventMetadata::from_value(json!({ "description": "legacy" })).unwrap();
        assert_eq!(metadata.description(), Some("legacy"));

        let metadata = EventMetadata::from_value(json!({
            "executionDescription": "current",
            "description": "legacy"
        }))
        .unwrap();
        assert_eq!(metadata.description(), Some("current"));
    }

    #[test]
    fn empty_execution_url_is_treated_as_absent() {
        let metadata = EventMetadata::from_value(json!({ "executionUrl": "" })).unwrap();
        assert!(metadata.execution_url().is_none());
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let result = EventMetadata::from_value(json!({ "executionName": { "a": 1 } }));
        match result {
            Err(MetadataError::Invalid(msg)) => assert!(!msg.is_empty()),
            Ok(m) => panic!("Expected Invalid, got {:?}", m),
        }
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(EventMetadata::from_value(json!("executionName")).is_err());
        assert!(EventMetadata::from_value(json!(42)).is_err());
        assert!(EventMetadata::from_json_str("not json").is_err());
    }
}
