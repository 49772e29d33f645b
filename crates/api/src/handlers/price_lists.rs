//! Handlers for `/price-lists` and their item prices.
//!
//! Item writes carry cost, tax and one price driver; the other prices are
//! derived before anything is stored.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::error::CoreError;
use gestora_core::pagination::{search_pattern, PageRequest};
use gestora_core::pricing::{reprice, resolve_prices};
use gestora_core::types::DbId;
use gestora_core::validation::{validate_code, validate_date_range, validate_name};
use gestora_db::models::price_list::{
    CreatePriceList, ItemRequest, PriceList, PriceListItem, RepriceRequest, UpdatePriceList,
    UpsertItem,
};
use gestora_db::repositories::PriceListRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::tenant::TenantUser;
use crate::query::ListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Price list";
const ITEM_ENTITY: &str = "Price list item";

#[derive(Debug, Deserialize)]
pub struct ItemListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RepriceOutcome {
    pub updated: u64,
    pub percent: f64,
}

// ---------------------------------------------------------------------------
// Price lists
// ---------------------------------------------------------------------------

/// GET /api/v1/price-lists
pub async fn list_price_lists(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedResponse<PriceList>>> {
    let page = params.page_request();
    let lists = PriceListRepo::list(&state.pool, user.tenant_id, &params.filter(), &page).await?;
    Ok(Json(PaginatedResponse::new(lists, &page)))
}

/// GET /api/v1/price-lists/{id}
pub async fn get_price_list(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PriceList>>> {
    let list = find_list(&state, user.tenant_id, id).await?;
    Ok(Json(DataResponse { data: list }))
}

/// POST /api/v1/price-lists
///
/// `is_default: true` clears the flag on every other list of the tenant.
pub async fn create_price_list(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreatePriceList>,
) -> AppResult<(StatusCode, Json<DataResponse<PriceList>>)> {
    input.validate()?;
    validate_code("code", &input.code)?;
    validate_name("name", &input.name)?;
    validate_date_range("valid_from", input.valid_from, "valid_to", input.valid_to)?;

    let list = PriceListRepo::create(&state.pool, user.tenant_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

/// PUT /api/v1/price-lists/{id}
pub async fn update_price_list(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePriceList>,
) -> AppResult<Json<DataResponse<PriceList>>> {
    input.validate()?;
    if let Some(code) = &input.code {
        validate_code("code", code)?;
    }
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }

    let current = find_list(&state, user.tenant_id, id).await?;
    validate_date_range(
        "valid_from",
        input.valid_from.or(current.valid_from),
        "valid_to",
        input.valid_to.or(current.valid_to),
    )?;

    let list = PriceListRepo::update(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: list }))
}

/// DELETE /api/v1/price-lists/{id}
pub async fn delete_price_list(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PriceListRepo::soft_delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

/// POST /api/v1/price-lists/{id}/reprice
///
/// Scale every sale price by `percent` and re-derive margin and retail.
pub async fn reprice_list(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<RepriceRequest>,
) -> AppResult<Json<DataResponse<RepriceOutcome>>> {
    find_list(&state, user.tenant_id, id).await?;

    let items = PriceListRepo::all_items(&state.pool, user.tenant_id, id).await?;
    let prices = items
        .iter()
        .map(|item| reprice(&item.prices(), input.percent).map(|p| (item.id, p)))
        .collect::<Result<Vec<_>, String>>()?;

    let updated = PriceListRepo::update_prices(&state.pool, user.tenant_id, id, &prices).await?;
    tracing::info!(price_list_id = id, updated, percent = input.percent, "Price list repriced");

    Ok(Json(DataResponse {
        data: RepriceOutcome {
            updated,
            percent: input.percent,
        },
    }))
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// GET /api/v1/price-lists/{id}/items
pub async fn list_items(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Query(params): Query<ItemListParams>,
) -> AppResult<Json<PaginatedResponse<PriceListItem>>> {
    find_list(&state, user.tenant_id, id).await?;

    let page = PageRequest::new(params.page, params.limit);
    let search = search_pattern(params.search.as_deref());
    let items =
        PriceListRepo::list_items(&state.pool, user.tenant_id, id, search.as_deref(), &page)
            .await?;
    Ok(Json(PaginatedResponse::new(items, &page)))
}

/// GET /api/v1/price-lists/{id}/items/{item_id}
pub async fn get_item(
    State(state): State<AppState>,
    user: TenantUser,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<PriceListItem>>> {
    let item = PriceListRepo::find_item(&state.pool, user.tenant_id, id, item_id)
        .await?
        .ok_or_else(|| CoreError::not_found(ITEM_ENTITY, item_id))?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/price-lists/{id}/items
///
/// Creates the item, or overwrites the prices of the same product code.
pub async fn upsert_item(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<ItemRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PriceListItem>>)> {
    find_list(&state, user.tenant_id, id).await?;
    let resolved = resolve_item(input)?;

    let item = PriceListRepo::upsert_item(&state.pool, user.tenant_id, id, &resolved).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/price-lists/{id}/items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    user: TenantUser,
    Path((id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<ItemRequest>,
) -> AppResult<Json<DataResponse<PriceListItem>>> {
    let resolved = resolve_item(input)?;

    let item = PriceListRepo::update_item(&state.pool, user.tenant_id, id, item_id, &resolved)
        .await?
        .ok_or_else(|| CoreError::not_found(ITEM_ENTITY, item_id))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/price-lists/{id}/items/{item_id}
pub async fn delete_item(
    State(state): State<AppState>,
    user: TenantUser,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if PriceListRepo::delete_item(&state.pool, user.tenant_id, id, item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ITEM_ENTITY, item_id).into())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_list(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<PriceList> {
    PriceListRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id).into())
}

fn resolve_item(input: ItemRequest) -> AppResult<UpsertItem> {
    input.validate()?;
    let prices = resolve_prices(input.cost_price, input.tax_rate, input.price)?;
    Ok(UpsertItem {
        product_code: input.product_code.trim().to_string(),
        product_name: input.product_name.trim().to_string(),
        prices,
    })
}
