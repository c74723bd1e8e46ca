use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SuccessStory {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub author_id: i64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

/// Published story joined with its author's public profile.
#[derive(Debug, Clone, Serialize)]
pub struct StoryWithAuthor {
    #[serde(flatten)]
    pub story: SuccessStory,
    pub author: crate::database::models::UserSummary,
}
