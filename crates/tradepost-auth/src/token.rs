//! JWT access token issuance and verification.
//!
//! Tokens are signed with HS256 using the shared secret from
//! [`AuthConfig`]. There is no refresh flow and no server-side
//! revocation: a token stays valid until its `exp`, and logout is a
//! client-side discard.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tradepost_core::models::identity::{GlobalRole, Identity};
use tradepost_core::models::membership::TenantRole;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// JWT claims embedded in every access token.
///
/// The two tenant fields are omitted from the wire entirely when the
/// token is unbound, so tokens issued before tenancy existed and
/// unbound tokens issued today are structurally identical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: identity ID.
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    /// Global role, serialized snake_case (`super_admin`, ...).
    pub role: GlobalRole,
    pub display_name: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID.
    pub jti: Uuid,
    /// Tenant the token is bound to, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tenant_id: Option<Uuid>,
    /// Caller's role inside the bound tenant.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tenant_role: Option<TenantRole>,
}

/// Tenant scope to embed when issuing a tenant-bound token.
#[derive(Debug, Clone, Copy)]
pub struct TenantBinding {
    pub tenant_id: Uuid,
    pub tenant_role: TenantRole,
}

/// Issue a signed HS256 access token for an identity.
///
/// The lifetime is fixed at issuance from the config; the optional
/// binding embeds tenant scope.
pub fn issue_token(
    identity: &Identity,
    binding: Option<TenantBinding>,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    issue_token_at(identity, binding, config, Utc::now())
}

/// Issue a token with an explicit issue instant.
///
/// Exists so expiry behavior can be exercised without sleeping; the
/// normal entry point is [`issue_token`].
pub fn issue_token_at(
    identity: &Identity,
    binding: Option<TenantBinding>,
    config: &AuthConfig,
    issued_at: DateTime<Utc>,
) -> Result<String, AuthError> {
    let expires_at = issued_at + Duration::seconds(config.token_lifetime_secs as i64);
    let claims = Claims {
        sub: identity.id,
        username: identity.username.clone(),
        email: identity.email.clone(),
        role: identity.role,
        display_name: identity.display_name.clone(),
        iss: config.token_issuer.clone(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4(),
        tenant_id: binding.map(|b| b.tenant_id),
        tenant_role: binding.map(|b| b.tenant_role),
    };

    let key = EncodingKey::from_secret(config.token_secret.as_bytes());
    let header = Header::new(Algorithm::HS256);
    jsonwebtoken::encode(&header, &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Validated JWT claims: a newtype proving the token was verified.
///
/// Guards and the context resolver accept only this type, so claims
/// that skipped verification cannot reach an authorization decision.
#[derive(Debug, Clone)]
pub struct ValidatedClaims(pub Claims);

/// Verify a token's signature, expiry, and issuer.
///
/// Expiry is the one failure callers may distinguish
/// ([`AuthError::TokenExpired`]); every other problem, from a bad
/// signature to an unknown role string, reads as
/// [`AuthError::TokenMalformed`]. Never panics on hostile input.
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<ValidatedClaims, AuthError> {
    let key = DecodingKey::from_secret(config.token_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.token_issuer]);
    validation.set_required_spec_claims(&["sub", "exp", "iat", "iss"]);

    jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map(|data| ValidatedClaims(data.claims))
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenMalformed,
        })
}

/// Extract the token from an `Authorization` header value, accepting
/// it with or without the `Bearer ` prefix.
pub fn bearer_token(header_value: &str) -> &str {
    header_value.strip_prefix("Bearer ").unwrap_or(header_value)
}
