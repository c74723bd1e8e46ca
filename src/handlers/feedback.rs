use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::{ApiResult, Envelope};
use crate::database::models::Feedback;
use crate::database::repository::NewFeedback;
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::policy;
use crate::validation::{FieldError, Validator};

struct CreateFeedbackInput {
    content: String,
    attached_file: Option<String>,
}

impl CreateFeedbackInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            content: v.require_string("content", 1, 500),
            attached_file: v.optional_url("attachedFile"),
        };
        v.finish(input)
    }
}

/// POST /feedback/feedback
pub async fn create(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<Feedback> {
    let input = CreateFeedbackInput::from_value(&body)?;

    let feedback = state
        .repos
        .feedbacks
        .create(NewFeedback {
            content: input.content,
            attached_file: input.attached_file,
            user_id: principal.user_id,
        })
        .await
        .map_err(|e| ApiError::internal("Error creating feedback.", e))?;

    Ok(Envelope::created("Feedback created successfully.", feedback))
}

/// GET /feedback/feedbacks
pub async fn list(State(state): State<crate::state::AppState>) -> ApiResult<Vec<Feedback>> {
    let feedbacks = state
        .repos
        .feedbacks
        .list()
        .await
        .map_err(|e| ApiError::internal("Error fetching feedbacks.", e))?;

    Ok(Envelope::ok("Feedbacks retrieved successfully.", feedbacks))
}

/// DELETE /feedback/feedback/:feedbackId
pub async fn delete(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path(feedback_id): Path<i64>,
) -> ApiResult<()> {
    let feedback = state
        .repos
        .feedbacks
        .find_by_id(feedback_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting feedback.", e))?
        .ok_or_else(|| ApiError::not_found("Feedback not found."))?;

    policy::require_owner(
        principal,
        feedback.user_id,
        "You are not authorized to delete this feedback.",
    )?;

    state
        .repos
        .feedbacks
        .delete(feedback_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting feedback.", e))?;

    Ok(Envelope::message("Feedback deleted successfully."))
}

#[cfg(test)]
mod tests {
    use crate::testing::{send, TestBackend};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn create_and_list() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/feedback/feedback",
            Some(&token),
            Some(json!({ "content": "The events page is great.", "attachedFile": "https://files.example/shot.png" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Feedback created successfully.");

        let (status, body) = send(&app, Method::GET, "/api/v1/feedback/feedbacks", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn content_is_required_and_capped() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/feedback/feedback",
            Some(&token),
            Some(json!({ "content": "x".repeat(501) })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"][0]["field"], "content");
    }

    #[tokio::test]
    async fn delete_enforces_ownership() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (owner, owner_token) = backend.seed_user("casey").await;
        let (_, other_token) = backend.seed_user("robin").await;
        let feedback = backend.seed_feedback(owner.id, "too many emails").await;

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/feedback/feedback/{}", feedback.id),
            Some(&other_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "You are not authorized to delete this feedback.");

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/feedback/feedback/{}", feedback.id),
            Some(&owner_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(backend.feedback_count().await, 0);
    }

    #[tokio::test]
    async fn listing_requires_auth() {
        let backend = TestBackend::new();
        let app = backend.app();

        let (status, _) = send(&app, Method::GET, "/api/v1/feedback/feedbacks", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
