//! Handlers for `/users` (tenant user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::error::CoreError;
use gestora_core::roles::{self, MIN_PASSWORD_LENGTH, ROLE_ADMIN, ROLE_USER};
use gestora_core::types::DbId;
use gestora_db::models::user::{CreateUser, CreateUserRequest, UpdateUser, User, UserResponse};
use gestora_db::repositories::{SessionRepo, UserRepo};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedResponse<UserResponse>>> {
    let page = params.page_request();
    let users = UserRepo::list(&state.pool, admin.tenant_id, &params.filter(), &page).await?;
    Ok(Json(PaginatedResponse::map(users, &page, UserResponse::from)))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, admin.tenant_id, id).await?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// POST /api/v1/users
///
/// Create a user in the admin's tenant. The role defaults to `user`.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    roles::validate_role(&role)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        admin.tenant_id,
        &CreateUser {
            email: input.email.trim().to_lowercase(),
            display_name: input.display_name.trim().to_string(),
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, tenant = %admin.tenant, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user.into() })))
}

/// PUT /api/v1/users/{id}
///
/// Update display name, role or active flag. The last active admin of a
/// tenant cannot be demoted or deactivated.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    if let Some(role) = &input.role {
        roles::validate_role(role)?;
    }

    let current = find_user(&state, admin.tenant_id, id).await?;
    let loses_admin = current.role == ROLE_ADMIN
        && current.is_active
        && (input.role.as_deref().is_some_and(|r| r != ROLE_ADMIN)
            || input.is_active == Some(false));
    if loses_admin {
        ensure_other_admin(&state, admin.tenant_id).await?;
    }

    let user = UserRepo::update(&state.pool, admin.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;

    if !user.is_active {
        SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
    }

    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/users/{id}
///
/// Deactivate a user and revoke their sessions. Returns 204.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot deactivate your own account".into(),
        )));
    }

    let current = find_user(&state, admin.tenant_id, id).await?;
    if current.role == ROLE_ADMIN && current.is_active {
        ensure_other_admin(&state, admin.tenant_id).await?;
    }

    if !UserRepo::deactivate(&state.pool, admin.tenant_id, id).await? {
        return Err(CoreError::not_found("User", id).into());
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, tenant = %admin.tenant, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id).into())
}

async fn ensure_other_admin(state: &AppState, tenant_id: DbId) -> AppResult<()> {
    if UserRepo::count_active_admins(&state.pool, tenant_id).await? <= 1 {
        return Err(AppError::Core(CoreError::Conflict(
            "A tenant must keep at least one active admin".into(),
        )));
    }
    Ok(())
}
