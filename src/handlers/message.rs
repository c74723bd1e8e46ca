use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::{ApiResult, Envelope};
use crate::database::models::Message;
use crate::database::repository::NewMessage;
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::validation::{FieldError, Validator};

struct MessageInput {
    content: Option<String>,
    attachment: Option<String>,
    receiver_id: i64,
}

impl MessageInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let content = v.optional_string("content", 1, 10_000);
        let attachment = v.optional_string("attachment", 1, 2048);
        let receiver_id = v.require_i64("receiverId");

        // Whole-object rule, checked after the per-field constraints
        if content.is_none() && attachment.is_none() {
            v.reject("content", "Either content or attachment must be provided");
        }

        v.finish(Self {
            content,
            attachment,
            receiver_id,
        })
    }
}

/// POST /message
///
/// The sender is always the authenticated principal. After the message is
/// persisted, one `new_message` event goes out to the real-time collaborator.
pub async fn send_message(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<Message> {
    let input = MessageInput::from_value(&body)?;

    let message = state
        .repos
        .messages
        .create(NewMessage {
            content: input.content,
            attachment: input.attachment,
            sender_id: principal.user_id,
            receiver_id: input.receiver_id,
        })
        .await
        .map_err(|e| ApiError::internal("Error sending message.", e))?;

    state.publisher.publish_new_message(&message).await;

    Ok(Envelope::created("Message sent successfully.", message))
}

/// GET /message/:peerId
pub async fn conversation(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path(peer_id): Path<i64>,
) -> ApiResult<Vec<Message>> {
    let messages = state
        .repos
        .messages
        .conversation(principal.user_id, peer_id)
        .await
        .map_err(|e| ApiError::internal("Error retrieving messages.", e))?;

    Ok(Envelope::ok("Messages retrieved successfully.", messages))
}

#[cfg(test)]
mod tests {
    use crate::testing::{send, TestBackend};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn requires_content_or_attachment() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;
        let (receiver, _) = backend.seed_user("robin").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/message",
            Some(&token),
            Some(json!({ "receiverId": receiver.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"][0]["issue"], "Either content or attachment must be provided");
        assert_eq!(backend.message_count().await, 0);
        assert_eq!(backend.published_events(), 0);
    }

    #[tokio::test]
    async fn content_alone_is_enough_and_publishes_once() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (sender, token) = backend.seed_user("casey").await;
        let (receiver, _) = backend.seed_user("robin").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/message",
            Some(&token),
            Some(json!({ "content": "hey!", "receiverId": receiver.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Message sent successfully.");
        assert_eq!(body["data"]["senderId"], sender.id);
        assert_eq!(body["data"]["receiverId"], receiver.id);
        assert_eq!(backend.published_events(), 1);
    }

    #[tokio::test]
    async fn attachment_alone_is_enough() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;
        let (receiver, _) = backend.seed_user("robin").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/message",
            Some(&token),
            Some(json!({ "attachment": "https://files.example/cv.pdf", "receiverId": receiver.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(backend.published_events(), 1);
    }

    #[tokio::test]
    async fn sender_is_the_principal_not_the_body() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (sender, token) = backend.seed_user("casey").await;
        let (receiver, _) = backend.seed_user("robin").await;

        // A spoofed senderId in the body is ignored as an unknown field
        let (_, body) = send(
            &app,
            Method::POST,
            "/api/v1/message",
            Some(&token),
            Some(json!({ "content": "hi", "receiverId": receiver.id, "senderId": 999 })),
        )
        .await;
        assert_eq!(body["data"]["senderId"], sender.id);
    }

    #[tokio::test]
    async fn conversation_returns_both_directions_oldest_first() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (casey, casey_token) = backend.seed_user("casey").await;
        let (robin, robin_token) = backend.seed_user("robin").await;
        let (_, outsider_token) = backend.seed_user("sasha").await;

        send(&app, Method::POST, "/api/v1/message", Some(&casey_token), Some(json!({ "content": "first", "receiverId": robin.id }))).await;
        send(&app, Method::POST, "/api/v1/message", Some(&robin_token), Some(json!({ "content": "second", "receiverId": casey.id }))).await;
        send(&app, Method::POST, "/api/v1/message", Some(&outsider_token), Some(json!({ "content": "unrelated", "receiverId": casey.id }))).await;

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/message/{}", robin.id),
            Some(&casey_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["data"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["content"], "first");
        assert_eq!(messages[1]["content"], "second");
    }

    #[tokio::test]
    async fn messaging_requires_auth() {
        let backend = TestBackend::new();
        let app = backend.app();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/message",
            None,
            Some(json!({ "content": "hi", "receiverId": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(backend.message_count().await, 0);
        assert_eq!(backend.published_events(), 0);
    }
}
