//! Authentication service: login, tenant binding, and account
//! administration over injected stores.

use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use chrono::Utc;
use tradepost_core::error::{TradepostError, TradepostResult};
use tradepost_core::models::identity::{CreateIdentity, Identity, IdentityProfile};
use tradepost_core::models::membership::Membership;
use tradepost_core::repository::{IdentityRepository, MembershipRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{self, TenantBinding};

/// Input for the login flow.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    /// Username or email, matched case-insensitively.
    pub identifier: String,
    /// Plaintext password, or a 64-hex client-side digest.
    pub secret: String,
}

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    /// The caller's identity, without credential material.
    pub profile: IdentityProfile,
}

/// Authentication service.
///
/// Generic over repository implementations so the auth layer has no
/// dependency on any particular store.
pub struct AuthService<I: IdentityRepository, M: MembershipRepository> {
    identities: I,
    memberships: M,
    config: AuthConfig,
}

impl<I: IdentityRepository, M: MembershipRepository> AuthService<I, M> {
    pub fn new(identities: I, memberships: M, config: AuthConfig) -> Self {
        Self {
            identities,
            memberships,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Check an identifier/secret pair.
    ///
    /// Unknown identifier and wrong secret produce the same error; an
    /// unknown identifier additionally burns a verification on the
    /// path the secret's shape selects, so the two cases cost the
    /// same wall-clock time.
    #[instrument(skip(self, secret), fields(identifier = %identifier))]
    pub async fn verify_credentials(
        &self,
        identifier: &str,
        secret: &str,
    ) -> TradepostResult<Identity> {
        // 1. Look up the identity: try username first, then email.
        let identity = match self.identities.get_by_username(identifier).await {
            Ok(identity) => identity,
            Err(TradepostError::NotFound { .. }) => {
                match self.identities.get_by_email(identifier).await {
                    Ok(identity) => identity,
                    Err(TradepostError::NotFound { .. }) => {
                        password::equalize_verification(secret);
                        tracing::warn!("credential check failed");
                        return Err(AuthError::InvalidCredentials.into());
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        // 2. Verify the secret through the path its shape selects.
        let matched = secret_matches(&identity, secret)?;

        if !matched {
            tracing::warn!("credential check failed");
            return Err(AuthError::InvalidCredentials.into());
        }

        tracing::info!(identity_id = %identity.id, "credentials verified");
        Ok(identity)
    }

    /// Authenticate and issue an unbound access token.
    #[instrument(skip(self, input), fields(identifier = %input.identifier))]
    pub async fn login(&self, input: LoginInput) -> TradepostResult<LoginOutput> {
        let identity = self
            .verify_credentials(&input.identifier, &input.secret)
            .await?;

        let token = token::issue_token(&identity, None, &self.config)?;

        tracing::info!(identity_id = %identity.id, "login succeeded");
        Ok(LoginOutput {
            token,
            expires_in: self.config.token_lifetime_secs,
            profile: IdentityProfile::from(&identity),
        })
    }

    /// Issue a tenant-bound token for an already-authenticated
    /// identity.
    ///
    /// The binding is explicit and membership-gated: without a
    /// membership in the target tenant the request is denied, and no
    /// tenant is ever inferred.
    #[instrument(skip(self, identity), fields(identity_id = %identity.id, tenant_id = %tenant_id))]
    pub async fn bind_tenant(
        &self,
        identity: &Identity,
        tenant_id: Uuid,
    ) -> TradepostResult<LoginOutput> {
        let membership = self
            .memberships
            .get(identity.id, tenant_id)
            .await?
            .ok_or(AuthError::Forbidden)?;

        let binding = TenantBinding {
            tenant_id,
            tenant_role: membership.role,
        };
        let token = token::issue_token(identity, Some(binding), &self.config)?;

        tracing::info!("tenant-bound token issued");
        Ok(LoginOutput {
            token,
            expires_in: self.config.token_lifetime_secs,
            profile: IdentityProfile::from(identity),
        })
    }

    /// Create an identity after policy and uniqueness checks.
    ///
    /// Callers gate this behind a super-admin check; the service
    /// itself only validates the input.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_account(&self, input: CreateIdentity) -> TradepostResult<Identity> {
        // 1. Password policy.
        let violations =
            password::validate_against_policy(&input.password, &self.config.password_policy);
        if !violations.is_empty() {
            return Err(TradepostError::Validation {
                message: violations.join("; "),
            });
        }

        // 2. Hash, and precompute the client digest when the salt is
        //    configured so digest clients can log in immediately.
        let password_hash = password::hash_password(&input.password)?;
        let legacy_digest = self
            .config
            .client_digest_salt
            .as_deref()
            .map(|salt| password::legacy_digest(salt, &input.password));

        // 3. Store. Uniqueness is the repository's job.
        let now = Utc::now();
        let identity = self
            .identities
            .create(Identity {
                id: Uuid::new_v4(),
                username: input.username,
                email: input.email,
                role: input.role,
                display_name: input.display_name,
                password_hash,
                legacy_digest,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(identity_id = %identity.id, "account created");
        Ok(identity)
    }

    /// Rotate a password after re-verifying the current secret.
    ///
    /// Both stored credential forms are refreshed together so the
    /// digest path cannot drift out of sync with the hash.
    #[instrument(skip(self, current_secret, new_password), fields(identity_id = %identity_id))]
    pub async fn change_password(
        &self,
        identity_id: Uuid,
        current_secret: &str,
        new_password: &str,
    ) -> TradepostResult<Identity> {
        let identity = self.identities.get_by_id(identity_id).await?;

        let matched = secret_matches(&identity, current_secret)?;
        if !matched {
            tracing::warn!("password change rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        let violations =
            password::validate_against_policy(new_password, &self.config.password_policy);
        if !violations.is_empty() {
            return Err(TradepostError::Validation {
                message: violations.join("; "),
            });
        }

        let password_hash = password::hash_password(new_password)?;
        let legacy_digest = self
            .config
            .client_digest_salt
            .as_deref()
            .map(|salt| password::legacy_digest(salt, new_password));

        let identity = self
            .identities
            .update_credentials(identity_id, password_hash, legacy_digest)
            .await?;

        tracing::info!("password changed");
        Ok(identity)
    }

    /// Grant a tenant role to an existing identity.
    #[instrument(skip(self, membership), fields(user_id = %membership.user_id, tenant_id = %membership.tenant_id))]
    pub async fn grant_membership(&self, membership: Membership) -> TradepostResult<Membership> {
        // The identity must exist; the repository rejects duplicates.
        self.identities.get_by_id(membership.user_id).await?;
        let membership = self.memberships.grant(membership).await?;
        tracing::info!("membership granted");
        Ok(membership)
    }

    /// Remove a membership. Tokens already bound to the tenant stay
    /// valid until expiry; only future bindings are affected.
    #[instrument(skip(self), fields(user_id = %user_id, tenant_id = %tenant_id))]
    pub async fn revoke_membership(&self, user_id: Uuid, tenant_id: Uuid) -> TradepostResult<()> {
        self.memberships.revoke(user_id, tenant_id).await?;
        tracing::info!("membership revoked");
        Ok(())
    }

    /// All memberships held by an identity.
    pub async fn memberships_for(&self, user_id: Uuid) -> TradepostResult<Vec<Membership>> {
        self.memberships.list_for_user(user_id).await
    }
}

/// Route a submitted secret to the credential form its shape selects
/// and compare.
///
/// Digest-shaped secrets are only ever compared against the stored
/// digest; with no stored digest they are a mismatch, never a
/// fallthrough to the plaintext path.
fn secret_matches(identity: &Identity, secret: &str) -> Result<bool, AuthError> {
    if password::is_digest_shaped(secret) {
        return Ok(match &identity.legacy_digest {
            Some(stored) => password::digest_matches(secret, stored),
            None => false,
        });
    }
    password::verify_password(secret, &identity.password_hash)
}
