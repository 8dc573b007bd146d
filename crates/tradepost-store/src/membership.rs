//! In-memory implementation of [`MembershipRepository`].

use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use tradepost_core::error::{TradepostError, TradepostResult};
use tradepost_core::models::membership::Membership;
use tradepost_core::repository::MembershipRepository;

/// Mutex-held list of memberships, unique per `(user_id, tenant_id)`.
#[derive(Default)]
pub struct MemoryMembershipRepository {
    inner: Mutex<Vec<Membership>>,
}

impl MemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> TradepostResult<MutexGuard<'_, Vec<Membership>>> {
        self.inner
            .lock()
            .map_err(|_| TradepostError::Store("membership store lock poisoned".into()))
    }
}

impl MembershipRepository for MemoryMembershipRepository {
    async fn grant(&self, membership: Membership) -> TradepostResult<Membership> {
        let mut inner = self.lock()?;

        let duplicate = inner
            .iter()
            .any(|m| m.user_id == membership.user_id && m.tenant_id == membership.tenant_id);
        if duplicate {
            return Err(TradepostError::AlreadyExists {
                entity: "membership".into(),
            });
        }

        inner.push(membership.clone());
        Ok(membership)
    }

    async fn revoke(&self, user_id: Uuid, tenant_id: Uuid) -> TradepostResult<()> {
        let mut inner = self.lock()?;
        let before = inner.len();
        inner.retain(|m| !(m.user_id == user_id && m.tenant_id == tenant_id));
        if inner.len() == before {
            return Err(TradepostError::NotFound {
                entity: "membership".into(),
                id: format!("{user_id}/{tenant_id}"),
            });
        }
        Ok(())
    }

    async fn get(&self, user_id: Uuid, tenant_id: Uuid) -> TradepostResult<Option<Membership>> {
        let inner = self.lock()?;
        Ok(inner
            .iter()
            .find(|m| m.user_id == user_id && m.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> TradepostResult<Vec<Membership>> {
        let inner = self.lock()?;
        Ok(inner
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }
}
