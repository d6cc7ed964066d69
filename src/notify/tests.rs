//! Unit tests for notify module.

use super::*;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::card::{Card, CardBuilder};
use crate::config::SecretString;
use crate::error::NotifyError;
use crate::metadata::EventMetadata;

const BASE: &str = "https://outlook.office.com/webhook/";

/// Records every send; fails for tokens listed in `failing_tokens`.
#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    failing_tokens: Vec<String>,
}

impl RecordingSender {
    fn failing(tokens: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn sent_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|(token, _)| token.clone())
            .collect();
        tokens.sort();
        tokens
    }
}

#[async_trait]
impl Sender for RecordingSender {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, token: &SecretString, body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((token.expose().to_string(), body.to_string()));
        if self.failing_tokens.iter().any(|t| t == token.expose()) {
            Err(NotifyError::SendFailed("test failure".to_string()))
        } else {
            Ok(())
        }
    }
}

fn make_card() -> Card {
    let metadata = EventMetadata {
        execution_status: Some("complete".to_string()),
        execution_name: Some("deploy-prod".to_string()),
        ..Default::default()
    };
    CardBuilder::default().build("Deployed", "Pipeline succeeded", &metadata)
}

// ===================================================================
// routing_token
// ===================================================================

#[test]
fn routing_token_strips_base_prefix() {
    let token = routing_token(&format!("{}abc@def/IncomingWebhook/123/456", BASE), BASE).unwrap();
    assert_eq!(token.expose(), "abc@def/IncomingWebhook/123/456");
}

#[test]
fn routing_token_rejects_foreign_url() {
    let result = routing_token("https://hooks.slack.com/services/T0/B0/X", BASE);
    match result {
        Err(NotifyError::InvalidDestination(msg)) => assert!(msg.contains(BASE)),
        other => panic!("Expected InvalidDestination, got {:?}", other),
    }
}

#[test]
fn routing_token_rejects_bare_prefix() {
    assert!(matches!(
        routing_token(BASE, BASE),
        Err(NotifyError::InvalidDestination(_))
    ));
}

#[test]
fn routing_token_prefix_is_case_sensitive() {
    assert!(routing_token("HTTPS://outlook.office.com/webhook/abc", BASE).is_err());
}

// ===================================================================
// Dispatcher
// ===================================================================

#[tokio::test]
async fn dispatch_sends_serialized_card_to_each_destination() {
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::new(sender.clone());
    let card = make_card();

    let destinations = vec![format!("{}token-a", BASE), format!("{}token-b", BASE)];
    let results = dispatcher.dispatch(&destinations, &card).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(DeliveryResult::is_success));
    assert_eq!(sender.sent_tokens(), vec!["token-a", "token-b"]);

    let expected_body = card.to_json().unwrap();
    for (_, body) in sender.sent.lock().unwrap().iter() {
        assert_eq!(body, &expected_body);
    }
}

#[tokio::test]
async fn dispatch_bad_prefix_does_not_block_other_destinations() {
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::new(sender.clone());

    let destinations = ["https://example.com/not-teams", "https://outlook.office.com/webhook/good"];
    let results = dispatcher.dispatch(&destinations, &make_card()).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].index, 0);
    assert!(matches!(
        results[0].outcome,
        Err(NotifyError::InvalidDestination(_))
    ));
    assert_eq!(results[1].index, 1);
    assert!(results[1].is_success());
    assert_eq!(sender.sent_tokens(), vec!["good"]);
}

#[tokio::test]
async fn dispatch_sender_failure_is_reported_per_destination() {
    let sender = Arc::new(RecordingSender::failing(&["broken"]));
    let dispatcher = Dispatcher::new(sender.clone());

    let destinations = [
        format!("{}ok-1", BASE),
        format!("{}broken", BASE),
        format!("{}ok-2", BASE),
    ];
    let results = dispatcher.dispatch(&destinations, &make_card()).await;

    let outcomes: Vec<bool> = results.iter().map(DeliveryResult::is_success).collect();
    assert_eq!(outcomes, vec![true, false, true]);
    assert!(matches!(results[1].outcome, Err(NotifyError::SendFailed(_))));
    assert_eq!(sender.sent_tokens(), vec!["broken", "ok-1", "ok-2"]);
}

#[tokio::test]
async fn dispatch_empty_destinations_sends_nothing() {
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::new(sender.clone());

    let destinations: Vec<String> = Vec::new();
    let results = dispatcher.dispatch(&destinations, &make_card()).await;

    assert!(results.is_empty());
    assert!(sender.sent_tokens().is_empty());
}

#[tokio::test]
async fn dispatch_with_custom_base_url() {
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = Dispatcher::with_base_url(sender.clone(), "https://teams.internal/hook/");
    assert_eq!(dispatcher.base_url(), "https://teams.internal/hook/");

    let results = dispatcher
        .dispatch(&["https://teams.internal/hook/xyz", BASE], &make_card())
        .await;

    assert!(results[0].is_success());
    assert!(!results[1].is_success());
    assert_eq!(sender.sent_tokens(), vec!["xyz"]);
}

#[test]
fn delivery_result_debug_redacts_destination() {
    let result = DeliveryResult {
        index: 0,
        destination: SecretString::new(format!("{}secret-token", BASE)),
        outcome: Ok(()),
    };
    let debug = format!("{:?}", result);
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("[REDACTED]"));
}

#[test]
fn dispatcher_debug_shows_sender_name() {
    let dispatcher = Dispatcher::new(Arc::new(RecordingSender::default()));
    let debug = format!("{:?}", dispatcher);
    assert!(debug.contains("recording"));
    assert!(debug.contains(BASE));
}

// ===================================================================
// backoff_delay
// ===================================================================

#[test]
fn backoff_delay_calculation() {
    let base = Duration::from_millis(500);
    let max = Duration::from_secs(5);

    assert_eq!(backoff_delay(0, base, max), Duration::from_millis(500));
    assert_eq!(backoff_delay(1, base, max), Duration::from_millis(1000));
    assert_eq!(backoff_delay(2, base, max), Duration::from_millis(2000));
    assert_eq!(backoff_delay(3, base, max), Duration::from_millis(4000));
    assert_eq!(backoff_delay(4, base, max), Duration::from_secs(5));
}

#[test]
fn backoff_delay_handles_overflow() {
    let base = Duration::from_millis(500);
    let max = Duration::from_secs(5);
    assert_eq!(backoff_delay(100, base, max), max);
}
