//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gestora_core::error::CoreError;
use gestora_core::roles::ROLE_ADMIN;

use super::tenant::TenantUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role within the requested tenant. Rejects with 403
/// Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub TenantUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = TenantUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
