//! In-memory implementation of [`IdentityRepository`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use tradepost_core::error::{TradepostError, TradepostResult};
use tradepost_core::models::identity::Identity;
use tradepost_core::repository::IdentityRepository;

/// Mutex-held map of identities keyed by id.
///
/// Username and email uniqueness is enforced case-insensitively, and
/// all lookups ignore case. No lock is held across an await point.
#[derive(Default)]
pub struct MemoryIdentityRepository {
    inner: Mutex<HashMap<Uuid, Identity>>,
}

impl MemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> TradepostResult<MutexGuard<'_, HashMap<Uuid, Identity>>> {
        self.inner
            .lock()
            .map_err(|_| TradepostError::Store("identity store lock poisoned".into()))
    }
}

impl IdentityRepository for MemoryIdentityRepository {
    async fn create(&self, identity: Identity) -> TradepostResult<Identity> {
        let mut inner = self.lock()?;

        let duplicate = inner.values().any(|existing| {
            existing.username.eq_ignore_ascii_case(&identity.username)
                || existing.email.eq_ignore_ascii_case(&identity.email)
        });
        if duplicate {
            return Err(TradepostError::AlreadyExists {
                entity: "identity".into(),
            });
        }

        inner.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn get_by_id(&self, id: Uuid) -> TradepostResult<Identity> {
        let inner = self.lock()?;
        inner
            .get(&id)
            .cloned()
            .ok_or_else(|| TradepostError::NotFound {
                entity: "identity".into(),
                id: id.to_string(),
            })
    }

    async fn get_by_username(&self, username: &str) -> TradepostResult<Identity> {
        let inner = self.lock()?;
        inner
            .values()
            .find(|identity| identity.username.eq_ignore_ascii_case(username))
            .cloned()
            .ok_or_else(|| TradepostError::NotFound {
                entity: "identity".into(),
                id: format!("username={username}"),
            })
    }

    async fn get_by_email(&self, email: &str) -> TradepostResult<Identity> {
        let inner = self.lock()?;
        inner
            .values()
            .find(|identity| identity.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| TradepostError::NotFound {
                entity: "identity".into(),
                id: format!("email={email}"),
            })
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        password_hash: String,
        legacy_digest: Option<String>,
    ) -> TradepostResult<Identity> {
        let mut inner = self.lock()?;
        let identity = inner
            .get_mut(&id)
            .ok_or_else(|| TradepostError::NotFound {
                entity: "identity".into(),
                id: id.to_string(),
            })?;

        identity.password_hash = password_hash;
        identity.legacy_digest = legacy_digest;
        identity.updated_at = chrono::Utc::now();
        Ok(identity.clone())
    }
}
