//! Tenant-scoped in-memory record collections.
//!
//! [`ScopedRecords`] is the seam where domain collections (inventory,
//! repairs, transactions) meet the isolation rules: every operation
//! takes the caller's [`IsolationContext`], inserts stamp the tenant
//! tag, and reads filter by visibility. A record hidden by scope
//! behaves exactly like a record that does not exist.

use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use tradepost_core::error::{TradepostError, TradepostResult};
use tradepost_core::scope::{IsolationContext, TenantTagged};

/// Store records addressable by id.
pub trait Keyed {
    fn id(&self) -> Uuid;
}

/// A mutex-held collection of tenant-taggable records.
pub struct ScopedRecords<R> {
    entity: &'static str,
    inner: Mutex<Vec<R>>,
}

impl<R: TenantTagged + Keyed + Clone> ScopedRecords<R> {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            inner: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> TradepostResult<MutexGuard<'_, Vec<R>>> {
        self.inner
            .lock()
            .map_err(|_| TradepostError::Store(format!("{} store lock poisoned", self.entity)))
    }

    fn not_found(&self, id: Uuid) -> TradepostError {
        TradepostError::NotFound {
            entity: self.entity.into(),
            id: id.to_string(),
        }
    }

    /// Stamp the caller's tenant and insert, in one step under the
    /// collection lock. No reader can observe the record without its
    /// tag.
    pub fn insert(&self, ctx: &IsolationContext, mut record: R) -> TradepostResult<R> {
        ctx.stamp_tenant(&mut record);
        let mut inner = self.lock()?;
        inner.push(record.clone());
        Ok(record)
    }

    /// Fetch a record the caller may see.
    pub fn get(&self, ctx: &IsolationContext, id: Uuid) -> TradepostResult<R> {
        let inner = self.lock()?;
        let record = inner
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        ctx.ensure_visible(record, self.entity, id)?;
        Ok(record.clone())
    }

    /// List records in insertion order, scoped to the caller.
    pub fn list(&self, ctx: &IsolationContext) -> TradepostResult<Vec<R>> {
        let inner = self.lock()?;
        Ok(ctx.filter_visible(inner.clone()))
    }

    /// Apply a mutation to a record the caller may see.
    ///
    /// The tenant tag is restored after the closure runs, so a
    /// mutation can never move a record across tenants.
    pub fn modify(
        &self,
        ctx: &IsolationContext,
        id: Uuid,
        mutate: impl FnOnce(&mut R),
    ) -> TradepostResult<R> {
        let mut inner = self.lock()?;
        let record = inner
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        ctx.ensure_visible(record, self.entity, id)?;

        let owner = record.tenant_id();
        mutate(record);
        record.set_tenant_id(owner);
        Ok(record.clone())
    }

    /// Remove a record the caller may see.
    pub fn remove(&self, ctx: &IsolationContext, id: Uuid) -> TradepostResult<()> {
        let mut inner = self.lock()?;
        let position = inner
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        ctx.ensure_visible(&inner[position], self.entity, id)?;
        inner.remove(position);
        Ok(())
    }
}
