//! Identity domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application-wide role attached to every identity.
///
/// Serialized in snake_case (`super_admin`, `admin`, `user`,
/// `viewer`), which is also the form embedded in token claims.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    SuperAdmin,
    Admin,
    User,
    Viewer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: GlobalRole,
    pub display_name: String,
    /// Argon2id PHC-format hash for the plaintext login path.
    /// Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Hex SHA-256 digest for clients that pre-hash before sending.
    /// Never serialized.
    #[serde(skip_serializing, default)]
    pub legacy_digest: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIdentity {
    pub username: String,
    pub email: String,
    pub role: GlobalRole,
    pub display_name: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
}

/// Client-facing view of an identity. Carries no credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: GlobalRole,
    pub display_name: String,
}

impl From<&Identity> for IdentityProfile {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
            display_name: identity.display_name.clone(),
        }
    }
}
