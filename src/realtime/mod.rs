//! Outbound event publication.
//!
//! The messaging endpoint publishes a `new_message` event after a message is
//! persisted. This layer's contract stops at the publish: fan-out and
//! delivery belong to whatever transport subscribes to the channel.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::database::models::Message;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Fire-and-forget notification that a message was created.
    async fn publish_new_message(&self, message: &Message);
}

/// In-process pub/sub over a tokio broadcast channel. Events published with
/// no subscriber attached are dropped, which is the intended fire-and-forget
/// behavior.
pub struct BroadcastPublisher {
    sender: broadcast::Sender<Value>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Attach a subscriber (e.g. a websocket fan-out task).
    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish_new_message(&self, message: &Message) {
        let event = serde_json::json!({
            "event": "new_message",
            "payload": message,
        });
        // Err here only means nobody is listening right now.
        if self.sender.send(event).is_err() {
            tracing::debug!("new_message event had no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_message() -> Message {
        Message {
            id: 1,
            content: Some("hello".into()),
            attachment: None,
            sender_id: 1,
            receiver_id: 2,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let publisher = BroadcastPublisher::new(8);
        let mut rx = publisher.subscribe();
        publisher.publish_new_message(&sample_message()).await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event["event"], "new_message");
        assert_eq!(event["payload"]["senderId"], 1);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_fine() {
        let publisher = BroadcastPublisher::new(8);
        publisher.publish_new_message(&sample_message()).await;
    }
}
