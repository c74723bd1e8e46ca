use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub content: String,
    pub attached_file: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
