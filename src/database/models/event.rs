use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub images: Option<Vec<String>>,
    pub link: Option<String>,
    pub date: DateTime<Utc>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
