use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: i64,
    pub amount: f64,
    pub currency: String,
    pub donor_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonorSummary {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub avatar_url: Option<String>,
}

/// One leaderboard row: a donor and the sum of their donations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub donor: DonorSummary,
    pub total_amount: f64,
}

/// Donation joined with its donor's public details.
#[derive(Debug, Clone, Serialize)]
pub struct DonationWithDonor {
    #[serde(flatten)]
    pub donation: Donation,
    pub donor: DonorSummary,
}
