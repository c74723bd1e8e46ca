use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::api::{ApiResult, Envelope};
use crate::database::models::{Connection, ConnectionStatus};
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::validation::{FieldError, Validator};

struct ConnectionRequestInput {
    following_id: i64,
}

impl ConnectionRequestInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            following_id: v.require_i64("followingId"),
        };
        v.finish(input)
    }
}

struct TransitionInput {
    connection_id: i64,
}

impl TransitionInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            connection_id: v.require_i64("connectionId"),
        };
        v.finish(input)
    }
}

/// POST /connection/connections
pub async fn send_request(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<Connection> {
    let input = ConnectionRequestInput::from_value(&body)?;
    let follower_id = principal.user_id;

    // Self-connections are rejected before any lookup
    if follower_id == input.following_id {
        return Err(ApiError::conflict("You cannot follow yourself."));
    }

    let existing = state
        .repos
        .connections
        .find_pair(follower_id, input.following_id)
        .await
        .map_err(|e| ApiError::internal("Error sending connection request.", e))?;
    if existing.is_some() {
        return Err(ApiError::conflict("Connection request already exists."));
    }

    let connection = state
        .repos
        .connections
        .create(follower_id, input.following_id)
        .await
        .map_err(|e| ApiError::internal("Error sending connection request.", e))?;

    Ok(Envelope::created("Connection request sent.", connection))
}

/// PATCH /connection/connections/accept
pub async fn accept(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<Connection> {
    transition(
        state,
        principal,
        body,
        ConnectionStatus::ACCEPTED,
        "Connection request accepted.",
        "Error accepting connection request.",
    )
    .await
}

/// PATCH /connection/connections/reject
pub async fn reject(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<Connection> {
    transition(
        state,
        principal,
        body,
        ConnectionStatus::REJECTED,
        "Connection request rejected.",
        "Error rejecting connection request.",
    )
    .await
}

/// Shared PENDING -> {ACCEPTED, REJECTED} transition. Only the recipient of
/// a pending request may act on it; every other combination is the same
/// undifferentiated 400.
async fn transition(
    state: crate::state::AppState,
    principal: Principal,
    body: Value,
    target_status: &str,
    success_message: &str,
    error_context: &str,
) -> ApiResult<Connection> {
    let input = TransitionInput::from_value(&body)?;

    let connection = state
        .repos
        .connections
        .find_by_id(input.connection_id)
        .await
        .map_err(|e| ApiError::internal(error_context, e))?;

    let valid = matches!(
        &connection,
        Some(c) if c.following_id == principal.user_id && c.status == ConnectionStatus::PENDING
    );
    if !valid {
        return Err(ApiError::bad_request("Invalid connection request."));
    }

    let updated = state
        .repos
        .connections
        .set_status(input.connection_id, target_status)
        .await
        .map_err(|e| ApiError::internal(error_context, e))?;

    Ok(Envelope::ok(success_message, updated))
}

/// GET /connection/connections
pub async fn view(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Value> {
    let followers = state
        .repos
        .connections
        .accepted_followers(principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error retrieving connections.", e))?;

    let followings = state
        .repos
        .connections
        .accepted_followings(principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error retrieving connections.", e))?;

    Ok(Envelope::ok(
        "Connections retrieved successfully.",
        json!({ "followers": followers, "followings": followings }),
    ))
}

#[cfg(test)]
mod tests {
    use crate::database::models::ConnectionStatus;
    use crate::testing::{send, TestBackend};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn self_connection_is_always_rejected() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (user, token) = backend.seed_user("casey").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/connection/connections",
            Some(&token),
            Some(json!({ "followingId": user.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You cannot follow yourself.");
        assert_eq!(backend.connection_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_ordered_pair_is_rejected_regardless_of_status() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (follower, token) = backend.seed_user("casey").await;
        let (following, following_token) = backend.seed_user("robin").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/connection/connections",
            Some(&token),
            Some(json!({ "followingId": following.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], ConnectionStatus::PENDING);
        let connection_id = body["data"]["id"].as_i64().unwrap();

        // Duplicate while PENDING
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/connection/connections",
            Some(&token),
            Some(json!({ "followingId": following.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Connection request already exists.");

        // Accept, then the duplicate is still rejected
        send(
            &app,
            Method::PATCH,
            "/api/v1/connection/connections/accept",
            Some(&following_token),
            Some(json!({ "connectionId": connection_id })),
        )
        .await;
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/connection/connections",
            Some(&token),
            Some(json!({ "followingId": following.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(backend.connection_count().await, 1);

        // The follower still gets to send the reverse edge
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/connection/connections",
            Some(&following_token),
            Some(json!({ "followingId": follower.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn only_the_recipient_may_accept() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, follower_token) = backend.seed_user("casey").await;
        let (following, _) = backend.seed_user("robin").await;
        let (_, outsider_token) = backend.seed_user("sasha").await;
        let connection = backend.seed_connection_from_token(&follower_token, following.id, &app).await;

        for token in [&follower_token, &outsider_token] {
            let (status, body) = send(
                &app,
                Method::PATCH,
                "/api/v1/connection/connections/accept",
                Some(token),
                Some(json!({ "connectionId": connection })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Invalid connection request.");
        }
        assert_eq!(
            backend.connection_status(connection).await.as_deref(),
            Some(ConnectionStatus::PENDING)
        );
    }

    #[tokio::test]
    async fn accept_and_reject_only_leave_pending() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, follower_token) = backend.seed_user("casey").await;
        let (following, following_token) = backend.seed_user("robin").await;
        let connection = backend.seed_connection_from_token(&follower_token, following.id, &app).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/connection/connections/accept",
            Some(&following_token),
            Some(json!({ "connectionId": connection })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Connection request accepted.");
        assert_eq!(body["data"]["status"], ConnectionStatus::ACCEPTED);

        // ACCEPTED is terminal; rejecting it now fails and changes nothing
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/connection/connections/reject",
            Some(&following_token),
            Some(json!({ "connectionId": connection })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid connection request.");
        assert_eq!(
            backend.connection_status(connection).await.as_deref(),
            Some(ConnectionStatus::ACCEPTED)
        );
    }

    #[tokio::test]
    async fn unknown_connection_id_is_invalid() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/connection/connections/reject",
            Some(&token),
            Some(json!({ "connectionId": 404 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid connection request.");
    }

    #[tokio::test]
    async fn view_returns_accepted_edges_grouped_by_direction() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, casey_token) = backend.seed_user("casey").await;
        let (robin, robin_token) = backend.seed_user("robin").await;
        let connection = backend.seed_connection_from_token(&casey_token, robin.id, &app).await;
        send(
            &app,
            Method::PATCH,
            "/api/v1/connection/connections/accept",
            Some(&robin_token),
            Some(json!({ "connectionId": connection })),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/v1/connection/connections",
            Some(&casey_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["followers"].as_array().unwrap().len(), 0);
        let followings = body["data"]["followings"].as_array().unwrap();
        assert_eq!(followings.len(), 1);
        assert_eq!(followings[0]["firstname"], "Robin");
    }

    #[tokio::test]
    async fn connection_routes_require_auth() {
        let backend = TestBackend::new();
        let app = backend.app();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/connection/connections",
            None,
            Some(json!({ "followingId": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(backend.connection_count().await, 0);
    }
}
