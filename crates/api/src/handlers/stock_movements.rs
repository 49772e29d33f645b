//! Handlers for `/stock-movements` and on-hand stock levels.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::error::CoreError;
use gestora_core::pagination::{search_pattern, PageRequest};
use gestora_core::stock::{self, KIND_TRANSFER};
use gestora_core::types::{Date, DbId};
use gestora_core::validation::validate_date_range;
use gestora_db::models::stock_movement::{
    CreateStockMovement, StockLevel, StockMovement, StockMovementFilter, UpdateStockMovement,
};
use gestora_db::repositories::StockMovementRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::tenant::TenantUser;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Stock movement";

#[derive(Debug, Deserialize)]
pub struct MovementListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub product_code: Option<String>,
    pub warehouse: Option<String>,
    pub kind: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LevelParams {
    pub warehouse: Option<String>,
    pub product_code: Option<String>,
}

/// GET /api/v1/stock-movements
pub async fn list_movements(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<MovementListParams>,
) -> AppResult<Json<PaginatedResponse<StockMovement>>> {
    validate_date_range("from", params.from, "to", params.to)?;
    let page = PageRequest::new(params.page, params.limit);
    let filter = StockMovementFilter {
        product_code: params.product_code,
        warehouse: params.warehouse,
        kind: params.kind,
        from: params.from,
        to: params.to,
        search: search_pattern(params.search.as_deref()),
    };
    let movements = StockMovementRepo::list(&state.pool, user.tenant_id, &filter, &page).await?;
    Ok(Json(PaginatedResponse::new(movements, &page)))
}

/// GET /api/v1/stock-movements/levels
///
/// On-hand quantity per product and warehouse. Transfers count out of the
/// source and into the destination.
pub async fn levels(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<LevelParams>,
) -> AppResult<Json<DataResponse<Vec<StockLevel>>>> {
    let levels = StockMovementRepo::levels(
        &state.pool,
        user.tenant_id,
        params.warehouse.as_deref(),
        params.product_code.as_deref(),
    )
    .await?;
    Ok(Json(DataResponse { data: levels }))
}

/// GET /api/v1/stock-movements/{id}
pub async fn get_movement(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StockMovement>>> {
    let movement = find_movement(&state, user.tenant_id, id).await?;
    Ok(Json(DataResponse { data: movement }))
}

/// POST /api/v1/stock-movements
pub async fn create_movement(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreateStockMovement>,
) -> AppResult<(StatusCode, Json<DataResponse<StockMovement>>)> {
    input.validate()?;
    stock::validate_movement(&input.shape())?;

    let movement = StockMovementRepo::create(&state.pool, user.tenant_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: movement })))
}

/// PUT /api/v1/stock-movements/{id}
///
/// The patch is merged over the stored movement and the result is validated
/// as a whole. Changing the kind away from `transfer` drops the destination.
pub async fn update_movement(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStockMovement>,
) -> AppResult<Json<DataResponse<StockMovement>>> {
    input.validate()?;
    let current = find_movement(&state, user.tenant_id, id).await?;

    let kind = input.kind.unwrap_or(current.kind);
    let destination_warehouse = if kind == KIND_TRANSFER {
        input.destination_warehouse.or(current.destination_warehouse)
    } else {
        None
    };
    let merged = CreateStockMovement {
        product_code: input.product_code.unwrap_or(current.product_code),
        product_name: input.product_name.or(current.product_name),
        warehouse: input.warehouse.unwrap_or(current.warehouse),
        destination_warehouse,
        kind,
        quantity: input.quantity.unwrap_or(current.quantity),
        unit_cost: input.unit_cost.or(current.unit_cost),
        movement_date: input.movement_date.unwrap_or(current.movement_date),
        reference: input.reference.or(current.reference),
        notes: input.notes.or(current.notes),
    };
    stock::validate_movement(&merged.shape())?;

    let movement = StockMovementRepo::update(&state.pool, user.tenant_id, id, &merged)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: movement }))
}

/// DELETE /api/v1/stock-movements/{id}
pub async fn delete_movement(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if StockMovementRepo::delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

async fn find_movement(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<StockMovement> {
    StockMovementRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id).into())
}
