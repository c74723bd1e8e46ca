use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::{ApiResult, Envelope};
use crate::database::models::{Comment, Like, Post};
use crate::database::repository::{NewComment, NewPost};
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::policy;
use crate::validation::{FieldError, Validator};

struct CreatePostInput {
    content: String,
    media_urls: Vec<String>,
}

impl CreatePostInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            content: v.require_string("content", 1, 1000),
            media_urls: v.optional_url_array("mediaUrls").unwrap_or_default(),
        };
        v.finish(input)
    }
}

struct CreateCommentInput {
    content: String,
}

impl CreateCommentInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            content: v.require_string("content", 1, 500),
        };
        v.finish(input)
    }
}

/// POST /post/create
pub async fn create(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<Post> {
    let input = CreatePostInput::from_value(&body)?;

    let post = state
        .repos
        .posts
        .create(NewPost {
            content: input.content,
            media_urls: input.media_urls,
            author_id: principal.user_id,
        })
        .await
        .map_err(|e| ApiError::internal("Error creating post.", e))?;

    Ok(Envelope::created("Post created successfully.", post))
}

/// DELETE /post/delete/:postId
pub async fn delete(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path(post_id): Path<i64>,
) -> ApiResult<()> {
    let post = state
        .repos
        .posts
        .find_by_id(post_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting post.", e))?
        .ok_or_else(|| ApiError::not_found("Post not found."))?;

    policy::require_owner(
        principal,
        post.author_id,
        "You are not authorized to delete this post.",
    )?;

    state
        .repos
        .posts
        .delete(post_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting post.", e))?;

    Ok(Envelope::message("Post deleted successfully."))
}

/// POST /post/:postId/comment
pub async fn add_comment(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path(post_id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Comment> {
    let input = CreateCommentInput::from_value(&body)?;

    state
        .repos
        .posts
        .find_by_id(post_id)
        .await
        .map_err(|e| ApiError::internal("Error adding comment.", e))?
        .ok_or_else(|| ApiError::not_found("Post not found."))?;

    let comment = state
        .repos
        .comments
        .create(NewComment {
            content: input.content,
            post_id,
            author_id: principal.user_id,
        })
        .await
        .map_err(|e| ApiError::internal("Error adding comment.", e))?;

    Ok(Envelope::created("Comment added successfully.", comment))
}

/// DELETE /post/:postId/comment/:commentId
pub async fn delete_comment(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> ApiResult<()> {
    // The comment must belong to the post named in the path
    let comment = state
        .repos
        .comments
        .find_in_post(comment_id, post_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting comment.", e))?
        .ok_or_else(|| ApiError::not_found("Comment not found."))?;

    policy::require_owner(
        principal,
        comment.author_id,
        "You are not authorized to delete this comment.",
    )?;

    state
        .repos
        .comments
        .delete(comment_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting comment.", e))?;

    Ok(Envelope::message("Comment deleted successfully."))
}

/// POST /post/like/:postId
pub async fn like(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path(post_id): Path<i64>,
) -> ApiResult<Like> {
    state
        .repos
        .posts
        .find_by_id(post_id)
        .await
        .map_err(|e| ApiError::internal("Error liking post.", e))?
        .ok_or_else(|| ApiError::not_found("Post not found."))?;

    let existing = state
        .repos
        .likes
        .find(post_id, principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error liking post.", e))?;
    if existing.is_some() {
        return Err(ApiError::conflict("You have already liked this post."));
    }

    let like = state
        .repos
        .likes
        .create(post_id, principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error liking post.", e))?;

    Ok(Envelope::created("Post liked successfully.", like))
}

/// DELETE /post/unlike/:postId
pub async fn unlike(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path(post_id): Path<i64>,
) -> ApiResult<()> {
    state
        .repos
        .posts
        .find_by_id(post_id)
        .await
        .map_err(|e| ApiError::internal("Error unliking post.", e))?
        .ok_or_else(|| ApiError::not_found("Post not found."))?;

    let existing = state
        .repos
        .likes
        .find(post_id, principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error unliking post.", e))?
        .ok_or_else(|| ApiError::conflict("You haven't liked this post yet."))?;

    state
        .repos
        .likes
        .delete(existing.id)
        .await
        .map_err(|e| ApiError::internal("Error unliking post.", e))?;

    Ok(Envelope::message("Post unliked successfully."))
}

#[cfg(test)]
mod tests {
    use crate::testing::{send, TestBackend};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn create_requires_token_and_mutates_nothing_without_one() {
        let backend = TestBackend::new();
        let app = backend.app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/post/create",
            None,
            Some(json!({ "content": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access Denied");
        assert_eq!(backend.post_count().await, 0);
    }

    #[tokio::test]
    async fn create_and_delete_as_owner() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (author, token) = backend.seed_user("casey").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/post/create",
            Some(&token),
            Some(json!({ "content": "First day at the new job!", "mediaUrls": ["https://img.example/a.png"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["authorId"], author.id);
        let post_id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/post/delete/{}", post_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Post deleted successfully.");
        assert_eq!(backend.post_count().await, 0);
    }

    #[tokio::test]
    async fn delete_as_non_owner_is_forbidden() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (author, _) = backend.seed_user("casey").await;
        let (_, other_token) = backend.seed_user("robin").await;
        let post = backend.seed_post(author.id, "mine").await;

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/post/delete/{}", post.id),
            Some(&other_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "You are not authorized to delete this post.");
        assert_eq!(backend.post_count().await, 1);
    }

    #[tokio::test]
    async fn delete_missing_post_is_404() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;

        let (status, body) = send(&app, Method::DELETE, "/api/v1/post/delete/99", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Post not found.");
    }

    #[tokio::test]
    async fn comments_follow_ownership_rules() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (author, author_token) = backend.seed_user("casey").await;
        let (_, commenter_token) = backend.seed_user("robin").await;
        let post = backend.seed_post(author.id, "open thread").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/post/{}/comment", post.id),
            Some(&commenter_token),
            Some(json!({ "content": "congrats!" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let comment_id = body["data"]["id"].as_i64().unwrap();

        // The post author does not own the comment
        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/post/{}/comment/{}", post.id, comment_id),
            Some(&author_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "You are not authorized to delete this comment.");

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/post/{}/comment/{}", post.id, comment_id),
            Some(&commenter_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(backend.comment_count().await, 0);
    }

    #[tokio::test]
    async fn comment_on_wrong_post_is_not_found() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (author, token) = backend.seed_user("casey").await;
        let post_a = backend.seed_post(author.id, "a").await;
        let post_b = backend.seed_post(author.id, "b").await;
        let comment = backend.seed_comment(post_a.id, author.id, "on a").await;

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/post/{}/comment/{}", post_b.id, comment.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Comment not found.");
    }

    #[tokio::test]
    async fn double_like_keeps_exactly_one_edge() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (author, token) = backend.seed_user("casey").await;
        let post = backend.seed_post(author.id, "like me").await;
        let uri = format!("/api/v1/post/like/{}", post.id);

        let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Post liked successfully.");

        let (status, body) = send(&app, Method::POST, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You have already liked this post.");
        assert_eq!(backend.like_count(post.id).await, 1);
    }

    #[tokio::test]
    async fn unlike_without_like_is_rejected() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (author, token) = backend.seed_user("casey").await;
        let post = backend.seed_post(author.id, "never liked").await;

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/post/unlike/{}", post.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You haven't liked this post yet.");
    }

    #[tokio::test]
    async fn like_then_unlike_roundtrip() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (author, token) = backend.seed_user("casey").await;
        let post = backend.seed_post(author.id, "toggle").await;

        send(&app, Method::POST, &format!("/api/v1/post/like/{}", post.id), Some(&token), None).await;
        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/post/unlike/{}", post.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Post unliked successfully.");
        assert_eq!(backend.like_count(post.id).await, 0);
    }
}
