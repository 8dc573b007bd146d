//! Tenant isolation: per-request caller scope and record visibility.
//!
//! Every read of a tenant-taggable record goes through
//! [`IsolationContext`]. The rules are evaluated per call and hold no
//! state, so there is nothing to invalidate when a caller switches
//! tenants; the next request simply carries a different context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TradepostError, TradepostResult};
use crate::models::membership::TenantRole;

/// A record that may be owned by a tenant.
///
/// Records created before tenant tagging was introduced carry `None`
/// and remain visible to every caller.
pub trait TenantTagged {
    fn tenant_id(&self) -> Option<Uuid>;
    fn set_tenant_id(&mut self, tenant_id: Option<Uuid>);
}

/// Caller scope derived from verified token claims.
///
/// Built fresh for each request and never persisted. `tenant_id` is
/// `None` for callers holding an unbound token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationContext {
    pub caller_id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub tenant_role: Option<TenantRole>,
    pub is_super_admin: bool,
}

impl IsolationContext {
    /// Whether the caller may see this record.
    ///
    /// Super-admins see everything. Untagged records are visible to
    /// everyone. Tagged records require an exact tenant match.
    pub fn is_visible<R: TenantTagged>(&self, record: &R) -> bool {
        if self.is_super_admin {
            return true;
        }
        match record.tenant_id() {
            None => true,
            Some(owner) => self.tenant_id == Some(owner),
        }
    }

    /// Drops records outside the caller's scope, preserving order.
    pub fn filter_visible<R: TenantTagged>(&self, records: Vec<R>) -> Vec<R> {
        records
            .into_iter()
            .filter(|record| self.is_visible(record))
            .collect()
    }

    /// Visibility check for single-record access.
    ///
    /// Denial reads as [`TradepostError::NotFound`], so a caller
    /// probing another tenant's ids learns nothing beyond "no such
    /// record".
    pub fn ensure_visible<R: TenantTagged>(
        &self,
        record: &R,
        entity: &str,
        id: Uuid,
    ) -> TradepostResult<()> {
        if self.is_visible(record) {
            Ok(())
        } else {
            Err(TradepostError::NotFound {
                entity: entity.into(),
                id: id.to_string(),
            })
        }
    }

    /// Tags a record being created with the caller's tenant.
    ///
    /// Non-super-admin callers bound to a tenant stamp that tenant.
    /// Every other caller (super-admin, or no tenant binding) leaves
    /// the record untagged, which makes it universally visible.
    pub fn stamp_tenant<R: TenantTagged>(&self, record: &mut R) {
        if !self.is_super_admin && self.tenant_id.is_some() {
            record.set_tenant_id(self.tenant_id);
        } else {
            record.set_tenant_id(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Part {
        id: Uuid,
        tenant_id: Option<Uuid>,
    }

    impl TenantTagged for Part {
        fn tenant_id(&self) -> Option<Uuid> {
            self.tenant_id
        }

        fn set_tenant_id(&mut self, tenant_id: Option<Uuid>) {
            self.tenant_id = tenant_id;
        }
    }

    fn part(tenant_id: Option<Uuid>) -> Part {
        Part {
            id: Uuid::new_v4(),
            tenant_id,
        }
    }

    fn tenant_ctx(tenant_id: Uuid) -> IsolationContext {
        IsolationContext {
            caller_id: Uuid::new_v4(),
            tenant_id: Some(tenant_id),
            tenant_role: Some(TenantRole::Manager),
            is_super_admin: false,
        }
    }

    fn unbound_ctx() -> IsolationContext {
        IsolationContext {
            caller_id: Uuid::new_v4(),
            tenant_id: None,
            tenant_role: None,
            is_super_admin: false,
        }
    }

    fn super_admin_ctx() -> IsolationContext {
        IsolationContext {
            caller_id: Uuid::new_v4(),
            tenant_id: None,
            tenant_role: None,
            is_super_admin: true,
        }
    }

    #[test]
    fn own_tenant_record_is_visible() {
        let tenant = Uuid::new_v4();
        assert!(tenant_ctx(tenant).is_visible(&part(Some(tenant))));
    }

    #[test]
    fn foreign_tenant_record_is_hidden() {
        let ctx = tenant_ctx(Uuid::new_v4());
        assert!(!ctx.is_visible(&part(Some(Uuid::new_v4()))));
    }

    #[test]
    fn untagged_record_is_visible_to_everyone() {
        let record = part(None);
        assert!(tenant_ctx(Uuid::new_v4()).is_visible(&record));
        assert!(unbound_ctx().is_visible(&record));
        assert!(super_admin_ctx().is_visible(&record));
    }

    #[test]
    fn unbound_caller_sees_only_untagged() {
        let ctx = unbound_ctx();
        assert!(ctx.is_visible(&part(None)));
        assert!(!ctx.is_visible(&part(Some(Uuid::new_v4()))));
    }

    #[test]
    fn super_admin_sees_everything() {
        let ctx = super_admin_ctx();
        assert!(ctx.is_visible(&part(Some(Uuid::new_v4()))));
        assert!(ctx.is_visible(&part(None)));
    }

    #[test]
    fn filter_preserves_order_and_is_idempotent() {
        let tenant = Uuid::new_v4();
        let ctx = tenant_ctx(tenant);
        let mine_a = part(Some(tenant));
        let shared = part(None);
        let foreign = part(Some(Uuid::new_v4()));
        let mine_b = part(Some(tenant));

        let records = vec![
            mine_a.clone(),
            shared.clone(),
            foreign,
            mine_b.clone(),
        ];
        let once = ctx.filter_visible(records);
        assert_eq!(once, vec![mine_a, shared, mine_b]);

        let twice = ctx.filter_visible(once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn ensure_visible_denies_as_not_found() {
        let ctx = tenant_ctx(Uuid::new_v4());
        let record = part(Some(Uuid::new_v4()));
        let err = ctx
            .ensure_visible(&record, "part", record.id)
            .unwrap_err();
        match err {
            TradepostError::NotFound { .. } => assert_eq!(err.status_code(), 404),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn stamp_applies_caller_tenant() {
        let tenant = Uuid::new_v4();
        let ctx = tenant_ctx(tenant);
        let mut record = part(None);
        ctx.stamp_tenant(&mut record);
        assert_eq!(record.tenant_id, Some(tenant));
    }

    #[test]
    fn stamp_overrides_preexisting_tag() {
        let tenant = Uuid::new_v4();
        let ctx = tenant_ctx(tenant);
        // A smuggled tenant id on the incoming record must not survive.
        let mut record = part(Some(Uuid::new_v4()));
        ctx.stamp_tenant(&mut record);
        assert_eq!(record.tenant_id, Some(tenant));
    }

    #[test]
    fn stamp_leaves_super_admin_records_untagged() {
        let ctx = super_admin_ctx();
        let mut record = part(Some(Uuid::new_v4()));
        ctx.stamp_tenant(&mut record);
        assert_eq!(record.tenant_id, None);
    }

    #[test]
    fn stamp_leaves_unbound_caller_records_untagged() {
        let ctx = unbound_ctx();
        let mut record = part(None);
        ctx.stamp_tenant(&mut record);
        assert_eq!(record.tenant_id, None);
    }
}
