//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async so a persistent backend can
//! implement them; the in-memory store used by tests resolves
//! immediately. Credential hashing happens above this layer, so every
//! backend stores fully prepared [`Identity`] values.

use uuid::Uuid;

use crate::error::TradepostResult;
use crate::models::identity::Identity;
use crate::models::membership::Membership;

// ---------------------------------------------------------------------------
// Identities (global scope)
// ---------------------------------------------------------------------------

/// Store contract for identities.
///
/// Username and email lookups are case-insensitive; `create` enforces
/// uniqueness on both.
pub trait IdentityRepository: Send + Sync {
    fn create(&self, identity: Identity) -> impl Future<Output = TradepostResult<Identity>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TradepostResult<Identity>> + Send;
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = TradepostResult<Identity>> + Send;
    fn get_by_email(&self, email: &str)
    -> impl Future<Output = TradepostResult<Identity>> + Send;
    /// Replace both stored credential forms in one step.
    fn update_credentials(
        &self,
        id: Uuid,
        password_hash: String,
        legacy_digest: Option<String>,
    ) -> impl Future<Output = TradepostResult<Identity>> + Send;
}

// ---------------------------------------------------------------------------
// Memberships (identity <-> tenant)
// ---------------------------------------------------------------------------

/// Store contract for tenant memberships.
pub trait MembershipRepository: Send + Sync {
    /// Grant a tenant role to an identity. Fails on duplicates.
    fn grant(
        &self,
        membership: Membership,
    ) -> impl Future<Output = TradepostResult<Membership>> + Send;

    /// Remove a membership.
    fn revoke(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> impl Future<Output = TradepostResult<()>> + Send;

    /// Look up a single membership. `None` is a normal outcome, not
    /// an error; callers decide what an absent membership means.
    fn get(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
    ) -> impl Future<Output = TradepostResult<Option<Membership>>> + Send;

    /// All memberships held by an identity.
    fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = TradepostResult<Vec<Membership>>> + Send;
}
