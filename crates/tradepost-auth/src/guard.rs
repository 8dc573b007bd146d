//! Request guards: authentication and role checks.
//!
//! Pure predicates over [`ValidatedClaims`]. The API layer runs them
//! before any handler logic; everything below the guards can assume
//! an authenticated, role-checked caller.

use tradepost_core::models::identity::GlobalRole;

use crate::error::AuthError;
use crate::token::ValidatedClaims;

/// Reject missing authentication.
pub fn require_authenticated(
    claims: Option<&ValidatedClaims>,
) -> Result<&ValidatedClaims, AuthError> {
    claims.ok_or(AuthError::Unauthenticated)
}

/// Reject callers whose global role is outside the allowed set.
pub fn require_any_role(
    claims: &ValidatedClaims,
    allowed: &[GlobalRole],
) -> Result<(), AuthError> {
    if allowed.contains(&claims.0.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Authentication, then authorization, in that order.
///
/// An anonymous caller always reads as [`AuthError::Unauthenticated`],
/// never [`AuthError::Forbidden`], even when both checks would fail.
pub fn authorize<'c>(
    claims: Option<&'c ValidatedClaims>,
    allowed: &[GlobalRole],
) -> Result<&'c ValidatedClaims, AuthError> {
    let claims = require_authenticated(claims)?;
    require_any_role(claims, allowed)?;
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::token::{issue_token, verify_token};
    use chrono::Utc;
    use tradepost_core::models::identity::Identity;
    use uuid::Uuid;

    fn claims_for(role: GlobalRole) -> ValidatedClaims {
        let config = AuthConfig::default();
        let identity = Identity {
            id: Uuid::new_v4(),
            username: "guard-test".into(),
            email: "guard@example.com".into(),
            role,
            display_name: "Guard Test".into(),
            password_hash: String::new(),
            legacy_digest: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let token = issue_token(&identity, None, &config).unwrap();
        verify_token(&token, &config).unwrap()
    }

    #[test]
    fn missing_claims_are_unauthenticated() {
        let err = require_authenticated(None).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[test]
    fn allowed_role_passes() {
        let claims = claims_for(GlobalRole::Admin);
        require_any_role(&claims, &[GlobalRole::SuperAdmin, GlobalRole::Admin]).unwrap();
    }

    #[test]
    fn disallowed_role_is_forbidden() {
        let claims = claims_for(GlobalRole::Viewer);
        let err = require_any_role(&claims, &[GlobalRole::SuperAdmin]).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));
    }

    #[test]
    fn authorize_checks_authentication_first() {
        // Both checks would fail; the authentication failure must win.
        let err = authorize(None, &[GlobalRole::SuperAdmin]).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[test]
    fn authorize_passes_through_claims() {
        let claims = claims_for(GlobalRole::User);
        let out = authorize(Some(&claims), &[GlobalRole::User]).unwrap();
        assert_eq!(out.0.username, "guard-test");
    }

    #[test]
    fn authorize_rejects_wrong_role() {
        let claims = claims_for(GlobalRole::User);
        let err = authorize(Some(&claims), &[GlobalRole::SuperAdmin]).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));
    }
}
