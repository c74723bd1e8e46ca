use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::error::ApiError;

/// Authenticated identity extracted from a verified bearer token.
///
/// Carries only the user id; role lookups happen at the policy layer when an
/// endpoint actually needs one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
}

/// Bearer-token middleware for protected routes.
///
/// Failure modes terminate the request before any controller logic runs:
/// - header missing or not `Bearer `-prefixed -> 401 "Access Denied"
/// - token present but failing verification   -> 401 "Invalid Token"
pub async fn auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(&headers)?;

    let claims = auth::verify_token(token).map_err(|e| {
        tracing::debug!("token rejected: {}", e);
        ApiError::unauthorized("Invalid Token")
    })?;

    request.extensions_mut().insert(Principal {
        user_id: claims.user_id,
    });

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Access Denied"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_access_denied() {
        let err = extract_bearer(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.message(), "Access Denied");
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn wrong_prefix_is_access_denied() {
        let err = extract_bearer(&headers_with("Basic abc123")).unwrap_err();
        assert_eq!(err.message(), "Access Denied");
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let token = extract_bearer(&headers_with("Bearer some.jwt.value")).unwrap();
        assert_eq!(token, "some.jwt.value");
    }
}
