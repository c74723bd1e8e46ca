use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Connection edge lifecycle. `PENDING` is the only state with outgoing
/// transitions; `ACCEPTED` and `REJECTED` are terminal.
pub struct ConnectionStatus;

impl ConnectionStatus {
    pub const PENDING: &'static str = "PENDING";
    pub const ACCEPTED: &'static str = "ACCEPTED";
    pub const REJECTED: &'static str = "REJECTED";
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: i64,
    pub follower_id: i64,
    pub following_id: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
