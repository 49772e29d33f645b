//! Tenant resolution for business endpoints.
//!
//! The caller names its tenant in the `x-tenant-id` header (tenant slug).
//! The header must match the tenant in the access token and that tenant
//! must still exist and be active.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gestora_core::error::CoreError;
use gestora_core::tenancy::TENANT_HEADER;
use gestora_core::types::DbId;
use gestora_db::repositories::TenantRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated user acting inside their own, active tenant.
///
/// Every repository call made on behalf of this user is scoped with
/// [`TenantUser::tenant_id`].
#[derive(Debug, Clone)]
pub struct TenantUser {
    pub user_id: DbId,
    pub tenant_id: DbId,
    pub tenant: String,
    pub role: String,
}

impl FromRequestParts<AppState> for TenantUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let header = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("Missing {TENANT_HEADER} header")))?;

        if header != user.tenant {
            tracing::warn!(
                user_id = user.user_id,
                token_tenant = %user.tenant,
                requested = %header,
                "Tenant header does not match token"
            );
            return Err(AppError::Core(CoreError::Forbidden(
                "Access to this tenant is not allowed".into(),
            )));
        }

        let tenant = TenantRepo::find_by_id(&state.pool, user.tenant_id)
            .await?
            .filter(|t| t.is_active && t.slug == user.tenant)
            .ok_or_else(|| {
                AppError::Core(CoreError::Forbidden("Tenant is unknown or inactive".into()))
            })?;

        Ok(TenantUser {
            user_id: user.user_id,
            tenant_id: tenant.id,
            tenant: tenant.slug,
            role: user.role,
        })
    }
}
