use axum::{extract::State, Json};
use serde_json::Value;

use crate::api::{ApiResult, Envelope};
use crate::database::models::{Donation, DonationWithDonor, LeaderboardEntry};
use crate::database::repository::NewDonation;
use crate::error::ApiError;
use crate::validation::{FieldError, Validator};

const LEADERBOARD_SIZE: i64 = 10;

struct DonationInput {
    amount: f64,
    currency: String,
    donor_id: i64,
}

impl DonationInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            amount: v.require_positive_f64("amount"),
            currency: v.require_string("currency", 1, 8),
            donor_id: v.require_i64("donorId"),
        };
        v.finish(input)
    }
}

/// GET /donation
pub async fn list(State(state): State<crate::state::AppState>) -> ApiResult<Vec<DonationWithDonor>> {
    let donations = state
        .repos
        .donations
        .list()
        .await
        .map_err(|e| ApiError::internal("Error retrieving donations.", e))?;

    Ok(Envelope::ok("Donations retrieved successfully.", donations))
}

/// POST /donation/create
pub async fn create(
    State(state): State<crate::state::AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Donation> {
    let input = DonationInput::from_value(&body)?;

    let donation = state
        .repos
        .donations
        .create(NewDonation {
            amount: input.amount,
            currency: input.currency,
            donor_id: input.donor_id,
        })
        .await
        .map_err(|e| ApiError::internal("Error creating donation.", e))?;

    Ok(Envelope::created("Donation created successfully.", donation))
}

/// GET /donation/leaderboard
pub async fn leaderboard(
    State(state): State<crate::state::AppState>,
) -> ApiResult<Vec<LeaderboardEntry>> {
    let entries = state
        .repos
        .donations
        .leaderboard(LEADERBOARD_SIZE)
        .await
        .map_err(|e| ApiError::internal("Error retrieving leaderboard.", e))?;

    Ok(Envelope::ok("Leaderboard retrieved successfully.", entries))
}

#[cfg(test)]
mod tests {
    use crate::testing::{send, TestBackend};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn create_validates_amount_positivity() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (donor, token) = backend.seed_user("casey").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/donation/create",
            Some(&token),
            Some(json!({ "amount": -20, "currency": "EUR", "donorId": donor.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"][0]["issue"], "Must be a positive number");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/donation/create",
            Some(&token),
            Some(json!({ "amount": 50.0, "currency": "EUR", "donorId": donor.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["amount"], 50.0);
    }

    #[tokio::test]
    async fn leaderboard_ranks_donors_by_total() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (casey, token) = backend.seed_user("casey").await;
        let (robin, _) = backend.seed_user("robin").await;

        for (donor_id, amount) in [(casey.id, 30.0), (robin.id, 100.0), (casey.id, 40.0)] {
            send(
                &app,
                Method::POST,
                "/api/v1/donation/create",
                Some(&token),
                Some(json!({ "amount": amount, "currency": "EUR", "donorId": donor_id })),
            )
            .await;
        }

        let (status, body) = send(&app, Method::GET, "/api/v1/donation/leaderboard", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["donor"]["firstname"], "Robin");
        assert_eq!(entries[0]["totalAmount"], 100.0);
        assert_eq!(entries[1]["totalAmount"], 70.0);
    }

    #[tokio::test]
    async fn list_is_public_and_includes_donor_details() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (casey, token) = backend.seed_user("casey").await;
        send(
            &app,
            Method::POST,
            "/api/v1/donation/create",
            Some(&token),
            Some(json!({ "amount": 25.0, "currency": "USD", "donorId": casey.id })),
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/api/v1/donation", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["donor"]["firstname"], "Casey");
        assert_eq!(body["data"][0]["currency"], "USD");
    }

    #[tokio::test]
    async fn create_requires_auth() {
        let backend = TestBackend::new();
        let app = backend.app();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/donation/create",
            None,
            Some(json!({ "amount": 5.0, "currency": "EUR", "donorId": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(backend.donation_count().await, 0);
    }
}
