use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{ApiResult, Envelope};
use crate::database::models::{Job, JobFilter};
use crate::database::repository::NewJob;
use crate::error::ApiError;
use crate::validation::{FieldError, Validator};

struct JobInput {
    title: String,
    company: String,
    experience: String,
    location: String,
    job_type: String,
    industry: String,
    job_function: String,
    remote: String,
}

impl JobInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            title: v.require_string("title", 1, 255),
            company: v.require_string("company", 1, 255),
            experience: v.require_string("experience", 1, 255),
            location: v.require_string("location", 1, 255),
            job_type: v.require_string("jobType", 1, 255),
            industry: v.require_string("industry", 1, 255),
            job_function: v.require_string("jobFunction", 1, 255),
            remote: v.require_string("remote", 1, 255),
        };
        v.finish(input)
    }

    fn into_new_job(self) -> NewJob {
        NewJob {
            title: self.title,
            company: self.company,
            experience: self.experience,
            location: self.location,
            job_type: self.job_type,
            industry: self.industry,
            job_function: self.job_function,
            remote: self.remote,
        }
    }
}

fn filter_from_query(params: &HashMap<String, String>) -> JobFilter {
    let get = |key: &str| params.get(key).filter(|v| !v.is_empty()).cloned();
    JobFilter {
        title: get("title"),
        company: get("company"),
        experience: get("experience"),
        location: get("location"),
        job_type: get("jobType"),
        industry: get("industry"),
        job_function: get("jobFunction"),
        remote: get("remote"),
    }
}

/// GET /job
pub async fn list(
    State(state): State<crate::state::AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Job>> {
    let filter = filter_from_query(&params);
    let jobs = state
        .repos
        .jobs
        .list(&filter)
        .await
        .map_err(|e| ApiError::internal("Error fetching jobs.", e))?;

    Ok(Envelope::ok("Jobs fetched successfully.", jobs))
}

/// POST /job/create
pub async fn create(
    State(state): State<crate::state::AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Job> {
    let input = JobInput::from_value(&body)?;

    let job = state
        .repos
        .jobs
        .create(input.into_new_job())
        .await
        .map_err(|e| ApiError::internal("Error creating job.", e))?;

    Ok(Envelope::created("Job created successfully.", job))
}

/// GET /job/:jobId
pub async fn get(
    State(state): State<crate::state::AppState>,
    Path(job_id): Path<i64>,
) -> ApiResult<Job> {
    let job = state
        .repos
        .jobs
        .find_by_id(job_id)
        .await
        .map_err(|e| ApiError::internal("Error fetching job.", e))?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;

    Ok(Envelope::ok("Job fetched successfully.", job))
}

/// PUT /job/update/:jobId
pub async fn update(
    State(state): State<crate::state::AppState>,
    Path(job_id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Job> {
    let input = JobInput::from_value(&body)?;

    let updated = state
        .repos
        .jobs
        .update(job_id, input.into_new_job())
        .await
        .map_err(|e| ApiError::internal("Error updating job.", e))?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;

    Ok(Envelope::ok("Job updated successfully.", updated))
}

/// DELETE /job/delete/:jobId
pub async fn delete(
    State(state): State<crate::state::AppState>,
    Path(job_id): Path<i64>,
) -> ApiResult<()> {
    let deleted = state
        .repos
        .jobs
        .delete(job_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting job.", e))?;
    if !deleted {
        return Err(ApiError::not_found("Job not found."));
    }

    Ok(Envelope::message("Job deleted successfully."))
}

#[cfg(test)]
mod tests {
    use crate::testing::{job_body, send, TestBackend};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn create_list_get_update_delete_cycle() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/job/create",
            Some(&token),
            Some(job_body("Platform Engineer", "Straylight")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let job_id = body["data"]["id"].as_i64().unwrap();

        // Listing is public
        let (status, body) = send(&app, Method::GET, "/api/v1/job", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/job/{}", job_id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["company"], "Straylight");

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/job/update/{}", job_id),
            Some(&token),
            Some(job_body("Staff Engineer", "Straylight")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Staff Engineer");

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/v1/job/delete/{}", job_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Job deleted successfully.");

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/job/{}", job_id), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_filters_by_substring_and_exact_fields() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;

        send(&app, Method::POST, "/api/v1/job/create", Some(&token), Some(job_body("Platform Engineer", "Straylight"))).await;
        send(&app, Method::POST, "/api/v1/job/create", Some(&token), Some(job_body("Data Analyst", "Tessier"))).await;

        let (_, body) = send(&app, Method::GET, "/api/v1/job?title=engineer", None, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["title"], "Platform Engineer");

        let (_, body) = send(&app, Method::GET, "/api/v1/job?remote=hybrid", None, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (_, body) = send(&app, Method::GET, "/api/v1/job?remote=onsite", None, None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn create_requires_every_field() {
        let backend = TestBackend::new();
        let app = backend.app();
        let (_, token) = backend.seed_user("casey").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/job/create",
            Some(&token),
            Some(serde_json::json!({ "title": "Solo title" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn mutations_require_auth() {
        let backend = TestBackend::new();
        let app = backend.app();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/job/create",
            None,
            Some(job_body("x", "y")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(backend.job_count().await, 0);
    }
}
