use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::api::{ApiResult, Envelope};
use crate::auth::{self, password};
use crate::config;
use crate::database::repository::{NewUser, UserUpdate};
use crate::error::ApiError;
use crate::middleware::Principal;
use crate::validation::{FieldError, Validator};

struct SignupInput {
    username: String,
    firstname: String,
    lastname: String,
    email: String,
    password: String,
}

impl SignupInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            username: v.require_string("username", 3, 255),
            firstname: v.require_string("firstname", 1, 255),
            lastname: v.require_string("lastname", 1, 255),
            email: v.require_email("email"),
            password: v.require_string("password", 8, 255),
        };
        v.finish(input)
    }
}

struct SigninInput {
    username: String,
    password: String,
}

impl SigninInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            username: v.require_string("username", 3, 255),
            password: v.require_string("password", 8, 255),
        };
        v.finish(input)
    }
}

struct UpdateUserInput {
    firstname: Option<String>,
    lastname: Option<String>,
    password: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    company: Option<String>,
    company_location: Option<String>,
    field_of_study: Option<String>,
    graduation_start_year: Option<i64>,
    graduation_end_year: Option<i64>,
    location: Option<String>,
}

impl UpdateUserInput {
    fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new(body);
        let input = Self {
            firstname: v.optional_string("firstname", 1, 255),
            lastname: v.optional_string("lastname", 1, 255),
            password: v.optional_string("password", 8, 255),
            avatar_url: v.optional_url("avatarUrl"),
            bio: v.optional_string("bio", 0, 500),
            company: v.optional_string("company", 0, 255),
            company_location: v.optional_string("companyLocation", 0, 255),
            field_of_study: v.optional_string("fieldOfStudy", 0, 255),
            graduation_start_year: v.optional_i64("graduationStartYear"),
            graduation_end_year: v.optional_i64("graduationEndYear"),
            location: v.optional_string("location", 0, 255),
        };
        v.finish(input)
    }
}

/// POST /user/signup
pub async fn signup(
    State(state): State<crate::state::AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Value> {
    let input = SignupInput::from_value(&body)?;

    let existing = state
        .repos
        .users
        .find_by_username(&input.username)
        .await
        .map_err(|e| ApiError::internal("Error creating user.", e))?;
    if existing.is_some() {
        return Err(ApiError::conflict("Username already exists."));
    }

    let existing_email = state
        .repos
        .users
        .find_by_email(&input.email)
        .await
        .map_err(|e| ApiError::internal("Error creating user.", e))?;
    if existing_email.is_some() {
        return Err(ApiError::conflict("Email already exists."));
    }

    let password_hash = password::hash_password(&input.password)
        .map_err(|e| ApiError::internal("Error creating user.", e))?;

    let user = state
        .repos
        .users
        .create(NewUser {
            username: input.username,
            firstname: input.firstname,
            lastname: input.lastname,
            email: input.email,
            password_hash,
        })
        .await
        .map_err(|e| ApiError::internal("Error creating user.", e))?;

    // Fresh accounts get the short-lived token
    let ttl = config::config().security.signup_token_ttl_hours;
    let token =
        auth::issue_token(user.id, ttl).map_err(|e| ApiError::internal("Error creating user.", e))?;

    Ok(Envelope::created(
        "User created successfully.",
        json!({ "token": token }),
    ))
}

/// POST /user/signin
pub async fn signin(
    State(state): State<crate::state::AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Value> {
    let input = SigninInput::from_value(&body)?;

    let user = state
        .repos
        .users
        .find_by_username(&input.username)
        .await
        .map_err(|e| ApiError::internal("Error during signin.", e))?
        .ok_or_else(|| ApiError::not_found("Username or password incorrect."))?;

    if !password::verify_password(&input.password, &user.password_hash) {
        return Err(ApiError::not_found("Username or password incorrect."));
    }

    let ttl = config::config().security.signin_token_ttl_hours;
    let token =
        auth::issue_token(user.id, ttl).map_err(|e| ApiError::internal("Error during signin.", e))?;

    Ok(Envelope::ok("Signin successful.", json!({ "token": token })))
}

/// PUT /user/update
pub async fn update(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<Value>,
) -> ApiResult<crate::database::models::User> {
    let input = UpdateUserInput::from_value(&body)?;

    state
        .repos
        .users
        .find_by_id(principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error updating user.", e))?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    // Identity fields are immutable once the account exists.
    let probe = Validator::new(&body);
    if probe.has("email") || probe.has("username") {
        return Err(ApiError::bad_request("Username and email cannot be changed."));
    }

    let password_hash = match input.password {
        Some(ref plaintext) => Some(
            password::hash_password(plaintext)
                .map_err(|e| ApiError::internal("Error updating user.", e))?,
        ),
        None => None,
    };

    let updated = state
        .repos
        .users
        .update(
            principal.user_id,
            UserUpdate {
                firstname: input.firstname,
                lastname: input.lastname,
                password_hash,
                avatar_url: input.avatar_url,
                bio: input.bio,
                company: input.company,
                company_location: input.company_location,
                field_of_study: input.field_of_study,
                graduation_start_year: input.graduation_start_year.map(|y| y as i32),
                graduation_end_year: input.graduation_end_year.map(|y| y as i32),
                location: input.location,
            },
        )
        .await
        .map_err(|e| ApiError::internal("Error updating user.", e))?;

    Ok(Envelope::ok("User updated successfully.", updated))
}

/// DELETE /user/delete
pub async fn delete(
    State(state): State<crate::state::AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<()> {
    state
        .repos
        .users
        .find_by_id(principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting user.", e))?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    state
        .repos
        .users
        .delete(principal.user_id)
        .await
        .map_err(|e| ApiError::internal("Error deleting user.", e))?;

    Ok(Envelope::message("User deleted successfully."))
}
