//! Ownership and role checks, applied after validation and before mutation.
//!
//! Two distinct policies over already-fetched data:
//! - ownership: the principal authored/owns the resource;
//! - role: the principal's account role grants the action.
//!
//! Keeping them as separate predicates means an endpoint cannot quietly swap
//! one for the other.

use crate::error::ApiError;
use crate::middleware::Principal;

/// Account role granted administrative actions.
pub const ROLE_ADMIN: &str = "ADMIN";

/// The principal must be the owner/author of the resource.
pub fn require_owner(principal: Principal, owner_id: i64, message: &str) -> Result<(), ApiError> {
    if principal.user_id == owner_id {
        Ok(())
    } else {
        Err(ApiError::forbidden(message))
    }
}

/// The principal's resolved role must be `ADMIN`. Ownership is irrelevant.
pub fn require_admin(role: &str, message: &str) -> Result<(), ApiError> {
    if role == ROLE_ADMIN {
        Ok(())
    } else {
        Err(ApiError::forbidden(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes_non_owner_is_forbidden() {
        let principal = Principal { user_id: 1 };
        assert!(require_owner(principal, 1, "nope").is_ok());
        let err = require_owner(principal, 2, "nope").unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn admin_role_is_exact() {
        assert!(require_admin("ADMIN", "nope").is_ok());
        assert!(require_admin("MEMBER", "nope").is_err());
        assert!(require_admin("admin", "nope").is_err());
    }

    #[test]
    fn ownership_does_not_imply_admin() {
        // A member who owns a resource still fails the role policy.
        assert!(require_admin("MEMBER", "Only admins can publish or unpublish success stories.").is_err());
    }
}
