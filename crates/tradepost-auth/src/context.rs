//! Tenant context resolution.
//!
//! Turns verified token claims into the [`IsolationContext`] that
//! scopes every data access for the request, and strips
//! client-supplied tenant identifiers from request bodies so the
//! token stays the only source of tenant scope.

use serde_json::Value;

use tradepost_core::models::identity::GlobalRole;
use tradepost_core::scope::IsolationContext;

use crate::token::ValidatedClaims;

/// Build the per-request isolation scope from verified claims.
///
/// Tenant fields are copied verbatim: an unbound token yields an
/// unbound context. Nothing here infers a "current" tenant.
pub fn resolve_context(claims: &ValidatedClaims) -> IsolationContext {
    let claims = &claims.0;
    IsolationContext {
        caller_id: claims.sub,
        tenant_id: claims.tenant_id,
        tenant_role: claims.tenant_role,
        is_super_admin: claims.role == GlobalRole::SuperAdmin,
    }
}

/// Remove client-supplied tenant identifiers from a request body.
///
/// Runs on every request that carries a body, for every caller,
/// before the body reaches domain code. Both the current `tenant_id`
/// spelling and the legacy `tenantId` one are stripped.
pub fn scrub_tenant_field(body: &mut Value) {
    if let Value::Object(map) = body {
        map.remove("tenant_id");
        map.remove("tenantId");
    }
}
