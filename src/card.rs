//! MessageCard construction for Microsoft Teams incoming webhooks.
//!
//! A [`Card`] is built once per event by [`CardBuilder::build`], serialized,
//! and dropped after delivery. Its shape is fixed:
//!
//! ```text
//! {
//!   "@context": ..., "@type": "MessageCard",
//!   "correlationId": "<uuid v4>", "summary": ..., "themeColor": "73DB69",
//!   "sections": [ { "activityTitle", "markdown" }, { "title", "facts": [...] } ],
//!   "potentialAction": [ { "@context", "@type", "name", "target": [url] } ]   // optional
//! }
//! ```
//!
//! Reference: <https://docs.microsoft.com/en-us/outlook/actionable-messages/message-card-reference>

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metadata::EventMetadata;

pub const DEFAULT_ACTIVITY_TITLE: &str = "Pipeline Notification";
pub const DEFAULT_FACTS_TITLE: &str = "Execution Status";
pub const DEFAULT_EVENT_NAME_LABEL: &str = "Event Name";
pub const DEFAULT_ACTION_NAME: &str = "View Execution";
pub const MESSAGE_CARD_CONTEXT: &str = "http://schema.org/extensions";
pub const MESSAGE_CARD_TYPE: &str = "MessageCard";
pub const VIEW_ACTION_CONTEXT: &str = "http://schema.org";
pub const VIEW_ACTION_TYPE: &str = "ViewAction";

/// Presentation strings and protocol tags injected into the builder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    pub activity_title: String,
    pub facts_title: String,
    /// Label of the event-name fact (some deployments use "Pipeline / Stage Name").
    pub event_name_label: String,
    pub action_name: String,
    pub context: String,
    pub message_type: String,
    pub action_context: String,
    pub action_type: String,
    pub markdown: bool,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            activity_title: DEFAULT_ACTIVITY_TITLE.to_string(),
            facts_title: DEFAULT_FACTS_TITLE.to_string(),
            event_name_label: DEFAULT_EVENT_NAME_LABEL.to_string(),
            action_name: DEFAULT_ACTION_NAME.to_string(),
            context: MESSAGE_CARD_CONTEXT.to_string(),
            message_type: MESSAGE_CARD_TYPE.to_string(),
            action_context: VIEW_ACTION_CONTEXT.to_string(),
            action_type: VIEW_ACTION_TYPE.to_string(),
            markdown: true,
        }
    }
}

/// Card accent color derived from the execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThemeColor {
    #[serde(rename = "EB1A1A")]
    Failed,
    #[serde(rename = "73DB69")]
    Complete,
    #[serde(rename = "0076D7")]
    Neutral,
}

impl ThemeColor {
    /// Select the color for a status. Matching is a case-sensitive substring
    /// test and "failed" wins over "complete".
    pub fn for_status(status: Option<&str>) -> Self {
        let status = status.unwrap_or("");
        if status.contains("failed") {
            ThemeColor::Failed
        } else if status.contains("complete") {
            ThemeColor::Complete
        } else {
            ThemeColor::Neutral
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            ThemeColor::Failed => "EB1A1A",
            ThemeColor::Complete => "73DB69",
            ThemeColor::Neutral => "0076D7",
        }
    }
}

/// One row of the facts section. A `None` value serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub name: String,
    pub value: Option<String>,
}

impl Fact {
    fn new(name: &str, value: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSection {
    pub activity_title: String,
    pub markdown: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactsSection {
    pub title: String,
    pub facts: Vec<Fact>,
}

/// "View Execution" link button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewAction {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub action_type: String,
    pub name: String,
    pub target: Vec<String>,
}

/// Notification card ready for serialization.
///
/// Fields are private: a card is never modified after [`CardBuilder::build`].
/// `sections` is a pair so the title/facts ordering cannot be broken; serde
/// writes tuples as JSON arrays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(rename = "@context")]
    context: String,
    #[serde(rename = "@type")]
    message_type: String,
    correlation_id: Uuid,
    summary: String,
    theme_color: ThemeColor,
    sections: (TitleSection, FactsSection),
    #[serde(skip_serializing_if = "Option::is_none")]
    potential_action: Option<Vec<ViewAction>>,
}

impl Card {
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn theme_color(&self) -> ThemeColor {
        self.theme_color
    }

    pub fn title_section(&self) -> &TitleSection {
        &self.sections.0
    }

    pub fn facts_section(&self) -> &FactsSection {
        &self.sections.1
    }

    /// Value of the first fact with the given name.
    ///
    /// Outer `None` means the fact is absent, inner `None` a null value.
    pub fn fact(&self, name: &str) -> Option<Option<&str>> {
        self.sections
            .1
            .facts
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_deref())
    }

    pub fn view_action(&self) -> Option<&ViewAction> {
        self.potential_action.as_ref().and_then(|a| a.first())
    }

    /// Serialize to the compact JSON body posted to the webhook.
    ///
    /// # Errors
    /// Propagates [`serde_json::Error`]; not expected for this type.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builds cards from rendered text and event metadata.
///
/// Holds only the immutable [`CardStyle`], so one builder can be shared
/// across tasks.
#[derive(Debug, Clone, Default)]
pub struct CardBuilder {
    style: CardStyle,
}

impl CardBuilder {
    pub fn new(style: CardStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    /// Build a card. Never fails: absent metadata yields omitted or null facts.
    ///
    /// # Arguments
    ///
    /// * `message` - Rendered message body; an empty message adds no "Message" fact
    /// * `summary` - Rendered summary, used as the card summary
    /// * `metadata` - Validated execution metadata
    pub fn build(&self, message: &str, summary: &str, metadata: &EventMetadata) -> Card {
        let theme_color = ThemeColor::for_status(metadata.execution_status.as_deref());

        let potential_action = metadata.execution_url().map(|url| {
            vec![ViewAction {
                context: self.style.action_context.clone(),
                action_type: self.style.action_type.clone(),
                name: self.style.action_name.clone(),
                target: vec![url.to_string()],
            }]
        });

        let card = Card {
            context: self.style.context.clone(),
            message_type: self.style.message_type.clone(),
            correlation_id: Uuid::new_v4(),
            summary: summary.to_string(),
            theme_color,
            sections: (
                TitleSection {
                    activity_title: self.style.activity_title.clone(),
                    markdown: self.style.markdown,
                },
                FactsSection {
                    title: self.style.facts_title.clone(),
                    facts: self.facts(message, metadata),
                },
            ),
            potential_action,
        };

        tracing::debug!(
            correlation_id = %card.correlation_id,
            theme_color = card.theme_color.hex(),
            fact_count = card.sections.1.facts.len(),
            has_action = card.potential_action.is_some(),
            "Card built"
        );

        card
    }

    fn facts(&self, message: &str, metadata: &EventMetadata) -> Vec<Fact> {
        let mut facts = Vec::with_capacity(7);

        if let Some(build) = &metadata.build_number {
            facts.push(Fact::new("Build Number", Some(build.to_string())));
        }

        facts.push(Fact::new(
            "Description",
            metadata.description().map(str::to_string),
        ));
        facts.push(Fact::new(
            "Execution Name",
            metadata.execution_name.clone(),
        ));

        if !message.is_empty() {
            facts.push(Fact::new("Message", Some(message.to_string())));
        }

        if let Some(event_name) = &metadata.event_name {
            facts.push(Fact::new(
                &self.style.event_name_label,
                Some(event_name.clone()),
            ));
        }

        facts.push(Fact::new("Status", metadata.execution_status.clone()));
        facts.push(Fact::new("Summary", metadata.execution_summary.clone()));

        facts
    }
}
