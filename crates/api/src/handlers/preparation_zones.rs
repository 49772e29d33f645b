//! Handlers for `/preparation-zones`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::error::CoreError;
use gestora_core::types::DbId;
use gestora_core::validation::{validate_code, validate_color, validate_name};
use gestora_db::models::preparation_zone::{
    CreatePreparationZone, PreparationZone, UpdatePreparationZone,
};
use gestora_db::repositories::PreparationZoneRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::tenant::TenantUser;
use crate::query::ListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Preparation zone";

/// GET /api/v1/preparation-zones
///
/// Ordered by `sort_order`, then name. Each row carries its family count.
pub async fn list_zones(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedResponse<PreparationZone>>> {
    let page = params.page_request();
    let zones =
        PreparationZoneRepo::list(&state.pool, user.tenant_id, &params.filter(), &page).await?;
    Ok(Json(PaginatedResponse::new(zones, &page)))
}

/// GET /api/v1/preparation-zones/{id}
pub async fn get_zone(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PreparationZone>>> {
    let zone = PreparationZoneRepo::find_by_id(&state.pool, user.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: zone }))
}

/// POST /api/v1/preparation-zones
pub async fn create_zone(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreatePreparationZone>,
) -> AppResult<(StatusCode, Json<DataResponse<PreparationZone>>)> {
    input.validate()?;
    validate_code("code", &input.code)?;
    validate_name("name", &input.name)?;
    if let Some(color) = &input.color {
        validate_color(color)?;
    }

    let zone = PreparationZoneRepo::create(&state.pool, user.tenant_id, &input).await?;
    tracing::info!(zone_id = zone.id, tenant = %user.tenant, "Preparation zone created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: zone })))
}

/// PUT /api/v1/preparation-zones/{id}
///
/// Partial update: omitted fields keep their value.
pub async fn update_zone(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePreparationZone>,
) -> AppResult<Json<DataResponse<PreparationZone>>> {
    input.validate()?;
    if let Some(code) = &input.code {
        validate_code("code", code)?;
    }
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(color) = &input.color {
        validate_color(color)?;
    }

    let zone = PreparationZoneRepo::update(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: zone }))
}

/// DELETE /api/v1/preparation-zones/{id}
///
/// Soft delete; families routed to the zone are detached. Returns 204.
pub async fn delete_zone(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PreparationZoneRepo::soft_delete(&state.pool, user.tenant_id, id).await? {
        tracing::info!(zone_id = id, tenant = %user.tenant, "Preparation zone deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}
