//! teams-notify - Pipeline execution notifications for Microsoft Teams.

pub mod card;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod notify;
pub mod service;

// Re-export commonly used types
pub use card::{Card, CardBuilder, CardStyle, Fact, ThemeColor};
pub use cli::LogFormat;
pub use metadata::{BuildNumber, EventMetadata};
pub use notify::{
    DEFAULT_WEBHOOK_BASE_URL, DeliveryResult, Dispatcher, Sender, TeamsWebhookSender,
    routing_token,
};
pub use service::{NOTIFICATION_TYPE, Notification, TeamsNotificationService};
