//! Tenant membership domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role an identity holds inside a single tenant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TenantRole {
    Admin,
    Manager,
    Viewer,
}

/// Links an identity to a tenant. Unique per `(user_id, tenant_id)`.
///
/// Holding a membership is what entitles an identity to request a
/// tenant-bound token for that tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: TenantRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_role_serializes_snake_case() {
        let json = serde_json::to_value(TenantRole::Manager).unwrap();
        assert_eq!(json, serde_json::json!("manager"));
    }
}
