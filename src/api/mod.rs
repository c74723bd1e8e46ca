use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Wrapper for successful replies in the uniform `{status, message, data?}`
/// envelope shared with `ApiError`.
#[derive(Debug)]
pub struct Envelope<T: Serialize> {
    pub status: StatusCode,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// 200 OK with payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 201 Created with payload
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// 200 OK, message only; the `data` key is omitted entirely.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let mut body = json!({
            "status": self.status.as_u16(),
            "message": self.message,
        });

        if let Some(data) = self.data {
            match serde_json::to_value(&data) {
                Ok(value) => {
                    body["data"] = value;
                }
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return crate::error::ApiError::internal(
                        "Failed to format response.",
                        e,
                    )
                    .into_response();
                }
            }
        }

        (self.status, Json(body)).into_response()
    }
}

/// Handler return type: success envelope or taxonomy error.
pub type ApiResult<T> = Result<Envelope<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_only_envelope_has_no_data_key() {
        let env = Envelope::message("Post deleted successfully.");
        let body = json!({
            "status": env.status.as_u16(),
            "message": env.message,
        });
        assert!(body.get("data").is_none());
        assert_eq!(body["status"], 200);
    }

    #[test]
    fn created_sets_201() {
        let env = Envelope::created("Post created successfully.", json!({"id": 1}));
        assert_eq!(env.status, StatusCode::CREATED);
    }
}
