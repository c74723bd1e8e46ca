use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub experience: String,
    pub location: String,
    pub job_type: String,
    pub industry: String,
    pub job_function: String,
    pub remote: String,
    pub created_at: DateTime<Utc>,
}

/// Optional listing filters. Substring fields match case-insensitively;
/// the rest match exactly.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub title: Option<String>,
    pub company: Option<String>,
    pub experience: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub industry: Option<String>,
    pub job_function: Option<String>,
    pub remote: Option<String>,
}
