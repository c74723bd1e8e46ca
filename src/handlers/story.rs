use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::Value;

use crate::api::{ApiResult, Envelope};
use crate::database::models::{StoryWithAuthor, SuccessStory};
use crate::database::repository::NewStory;
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::policy;
use crate::validation::{FieldError, Validator};

struct CreateStoryInput {
    title: String,
    description: String,
}

impl CreateStoryInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            title: v.require_string("title", 1, 255),
            description: v.require_string("description", 1, 10_000),
        };
        v.finish(input)
    }
}

struct PublishInput {
    published: bool,
}

impl PublishInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            published: v.require_bool("published"),
        };
        v.finish(input)
    }
}

/// GET /story
pub async fn list(State(state): State<crate::state::AppState>) -> ApiResult<Vec<StoryWithAuthor>> {
    let stories = state
        .repos
        .stories
        .list_published()
        .await
        .map_err(|e| ApiError::internal("Error fetching success stories.", e))?;

    Ok(Envelope::ok("Success stories retrieved successfully.", stories))
}

/// POST /story/create
pub async fn create(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<SuccessStory> {
    let input = CreateStoryInput::from_value(&body)?;

    let story = state
        .repos
        .stories
        .create(NewStory {
            title: input.title,
            description: input.description,
            author_id: principal.user_id,
        })
        .await
        .map_err(|e| ApiError::internal("Error creating success story.", e))?;

    Ok(Envelope::created("Success story created successfully.", story))
}

/// PUT /story/:storyId
///
/// Publication is a role policy, not an ownership one: authors cannot
/// publish their own stories unless they are admins.
pub async fn publish(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path(story_id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<SuccessStory> {
    let input = PublishInput::from_value(&body)?;

    state
        .repos
        .stories
        .find_by_id(story_id)
        .await
        .map_err(|e| ApiError::internal("Error updating success story.", e))?
        .ok_or_else(|| ApiError::not_found("Story not found."))?;

    let acting_user = state
        .repos
        .users
        .find_by_id(principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error updating success story.", e))?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    policy::require_admin(
        &acting_user.role,
        "Only admins can publish or unpublish success stories.",
    )?;

    let updated = state
        .repos
        .stories
        .set_published(story_id, input.published)
        .await
        .map_err(|e| ApiError::internal("Error updating success story.", e))?;

    Ok(Envelope::ok("Success story updated successfully.", updated))
}
