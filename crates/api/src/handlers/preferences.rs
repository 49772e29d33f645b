//! Per-user grid layout preferences.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::grid;
use gestora_db::models::grid_preference::{GridPreference, UpsertGridPreference};
use gestora_db::repositories::GridPreferenceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/preferences/grids/{grid_key}
pub async fn get_grid(
    State(state): State<AppState>,
    user: TenantUser,
    Path(grid_key): Path<String>,
) -> AppResult<Json<DataResponse<GridPreference>>> {
    grid::validate_key("grid key", &grid_key)?;
    let preference = GridPreferenceRepo::find(&state.pool, user.tenant_id, user.user_id, &grid_key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No saved layout for grid '{grid_key}'")))?;
    Ok(Json(DataResponse { data: preference }))
}

/// PUT /api/v1/preferences/grids/{grid_key}
pub async fn save_grid(
    State(state): State<AppState>,
    user: TenantUser,
    Path(grid_key): Path<String>,
    Json(input): Json<UpsertGridPreference>,
) -> AppResult<Json<DataResponse<GridPreference>>> {
    grid::validate_key("grid key", &grid_key)?;
    grid::validate_columns(&input.columns)?;

    let preference = GridPreferenceRepo::upsert(
        &state.pool,
        user.tenant_id,
        user.user_id,
        &grid_key,
        &input.columns,
    )
    .await?;
    Ok(Json(DataResponse { data: preference }))
}

/// DELETE /api/v1/preferences/grids/{grid_key}
///
/// Drops the saved layout so the client falls back to its default. Resetting
/// a grid that has no saved layout is not an error.
pub async fn reset_grid(
    State(state): State<AppState>,
    user: TenantUser,
    Path(grid_key): Path<String>,
) -> AppResult<StatusCode> {
    grid::validate_key("grid key", &grid_key)?;
    let removed =
        GridPreferenceRepo::delete(&state.pool, user.tenant_id, user.user_id, &grid_key).await?;
    tracing::debug!(user_id = user.user_id, grid_key = %grid_key, removed, "Grid layout reset");
    Ok(StatusCode::NO_CONTENT)
}
