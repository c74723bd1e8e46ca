pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

/// Claims embedded in every bearer token. The token carries nothing beyond
/// the user identity and its lifetime; authority is delegated entirely to
/// signature verification.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    InvalidSignature,
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "malformed token"),
            TokenError::InvalidSignature => write!(f, "invalid token signature"),
            TokenError::Expired => write!(f, "token expired"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issue a signed token for `user_id` with the given lifetime.
///
/// Signup uses the 1-hour TTL, signin the 24-hour TTL (see `SecurityConfig`);
/// the asymmetry is deliberate and callers pick the TTL from config.
pub fn issue_token(user_id: i64, ttl_hours: i64) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = &config::config().security.jwt_secret;
    let claims = Claims::new(user_id, ttl_hours);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token and return its claims.
///
/// The distinction between failure kinds exists for logging only; the
/// middleware collapses every failure into the same 401 reply.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    let secret = &config::config().security.jwt_secret;
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(decoded.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_roundtrip() {
        let token = issue_token(42, 1).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
    }

    #[test]
    fn expiry_tracks_requested_ttl() {
        let short = Claims::new(1, 1);
        let long = Claims::new(1, 24);
        assert_eq!(short.exp - short.iat, 3600);
        assert_eq!(long.exp - long.iat, 24 * 3600);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(7, 1).unwrap();
        let mut forged = token.clone();
        forged.pop();
        forged.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert!(verify_token(&forged).is_err());
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(verify_token("not-a-token"), Err(TokenError::Malformed));
    }
}
