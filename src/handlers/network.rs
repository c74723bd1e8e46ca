use axum::extract::{Query, State};
use serde_json::Value;
use std::collections::HashMap;

use crate::api::{ApiResult, Envelope};
use crate::database::models::{PeopleFilter, UserSummary};
use crate::error::ApiError;
use crate::validation::{FieldError, Validator};

struct SearchInput {
    search_query: String,
}

impl SearchInput {
    fn from_value(params: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(params);
        let input = Self {
            search_query: v.require_string("searchQuery", 1, 255),
        };
        v.finish(input)
    }
}

struct FilterInput {
    graduation_start_year_range_start: Option<i64>,
    graduation_start_year_range_end: Option<i64>,
    location: Option<String>,
    industry: Option<String>,
    field_of_study: Option<String>,
    company: Option<String>,
}

impl FilterInput {
    fn from_value(params: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(params);
        let input = Self {
            graduation_start_year_range_start: v.optional_i64_string("graduationStartYearRangeStart"),
            graduation_start_year_range_end: v.optional_i64_string("graduationStartYearRangeEnd"),
            location: v.optional_string("location", 1, 255),
            industry: v.optional_string("industry", 1, 255),
            field_of_study: v.optional_string("fieldOfStudy", 1, 255),
            company: v.optional_string("company", 1, 255),
        };
        v.finish(input)
    }

    fn into_filter(self) -> PeopleFilter {
        // The year range only applies when both ends are present
        let graduation_start_year_range = match (
            self.graduation_start_year_range_start,
            self.graduation_start_year_range_end,
        ) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        };
        PeopleFilter {
            graduation_start_year_range,
            location: self.location,
            industry: self.industry,
            field_of_study: self.field_of_study,
            company: self.company,
        }
    }
}

fn query_as_value(params: HashMap<String, String>) -> Value {
    Value::Object(
        params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

/// GET /network/search
pub async fn search(
    State(state): State<crate::state::AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<UserSummary>> {
    let params = query_as_value(params);
    let input = SearchInput::from_value(&params)?;

    let users = state
        .repos
        .users
        .search(&input.search_query)
        .await
        .map_err(|e| ApiError::internal("Error searching for users.", e))?;

    Ok(Envelope::ok("Users found.", users))
}

/// GET /network/filter
pub async fn filter(
    State(state): State<crate::state::AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<UserSummary>> {
    let params = query_as_value(params);
    let input = FilterInput::from_value(&params)?;

    let users = state
        .repos
        .users
        .filter(&input.into_filter())
        .await
        .map_err(|e| ApiError::internal("Error filtering users.", e))?;

    Ok(Envelope::ok("Users filtered successfully.", users))
}
