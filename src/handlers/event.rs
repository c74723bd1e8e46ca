use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::api::{ApiResult, Envelope};
use crate::database::models::Event;
use crate::database::repository::NewEvent;
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::policy;
use crate::validation::{FieldError, Validator};

struct CreateEventInput {
    title: String,
    content: String,
    images: Option<Vec<String>>,
    link: Option<String>,
    date: DateTime<Utc>,
}

impl CreateEventInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            title: v.require_string("title", 1, 100),
            content: v.require_string("content", 1, 10_000),
            images: v.optional_url_array("images"),
            link: v.optional_url("link"),
            date: v.require_datetime("date"),
        };
        v.finish(input)
    }
}

/// POST /event/create
pub async fn create(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<Event> {
    let input = CreateEventInput::from_value(&body)?;

    let event = state
        .repos
        .events
        .create(NewEvent {
            title: input.title,
            content: input.content,
            images: input.images,
            link: input.link,
            date: input.date,
            user_id: principal.user_id,
        })
        .await
        .map_err(|e| ApiError::internal("Error creating event.", e))?;

    Ok(Envelope::created("Event created successfully.", event))
}

/// GET /event/upcoming
pub async fn upcoming(State(state): State<crate::state::AppState>) -> ApiResult<Vec<Event>> {
    let events = state
        .repos
        .events
        .upcoming(Utc::now())
        .await
        .map_err(|e| ApiError::internal("Error fetching upcoming events.", e))?;

    Ok(Envelope::ok("Upcoming events retrieved successfully.", events))
}

/// GET /event/past
pub async fn past(State(state): State<crate::state::AppState>) -> ApiResult<Vec<Event>> {
    let events = state
        .repos
        .events
        .past(Utc::now())
        .await
        .map_err(|e| ApiError::internal("Error fetching past events.", e))?;

    Ok(Envelope::ok("Past events retrieved successfully.", events))
}

/// DELETE /event/:eventId
pub async fn delete(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Path(event_id): Path<i64>,
) -> ApiResult<()> {
    let event = state
        .repos
        .events
        .find_by_id(event_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting event.", e))?
        .ok_or_else(|| ApiError::not_found("Event not found."))?;

    policy::require_owner(
        principal,
        event.user_id,
        "You are not authorized to delete this event.",
    )?;

    state
        .repos
        .events
        .delete(event_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting event.", e))?;

    Ok(Envelope::message("Event deleted successfully."))
}
