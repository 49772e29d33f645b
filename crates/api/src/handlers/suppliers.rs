//! Handlers for `/suppliers`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::error::CoreError;
use gestora_core::types::DbId;
use gestora_core::validation::{validate_code, validate_name};
use gestora_db::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};
use gestora_db::repositories::{PaymentMethodRepo, SupplierRepo};
use validator::Validate;

use super::missing_reference;
use crate::error::AppResult;
use crate::middleware::tenant::TenantUser;
use crate::query::ListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Supplier";

/// GET /api/v1/suppliers
///
/// `search` matches name, trade name, code and tax id.
pub async fn list_suppliers(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedResponse<Supplier>>> {
    let page = params.page_request();
    let suppliers =
        SupplierRepo::list(&state.pool, user.tenant_id, &params.filter(), &page).await?;
    Ok(Json(PaginatedResponse::new(suppliers, &page)))
}

/// GET /api/v1/suppliers/{id}
pub async fn get_supplier(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Supplier>>> {
    let supplier = SupplierRepo::find_by_id(&state.pool, user.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: supplier }))
}

/// POST /api/v1/suppliers
pub async fn create_supplier(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreateSupplier>,
) -> AppResult<(StatusCode, Json<DataResponse<Supplier>>)> {
    input.validate()?;
    validate_code("code", &input.code)?;
    validate_name("name", &input.name)?;
    if let Some(method_id) = input.payment_method_id {
        ensure_method_exists(&state, user.tenant_id, method_id).await?;
    }

    let supplier = SupplierRepo::create(&state.pool, user.tenant_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: supplier })))
}

/// PUT /api/v1/suppliers/{id}
pub async fn update_supplier(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSupplier>,
) -> AppResult<Json<DataResponse<Supplier>>> {
    input.validate()?;
    if let Some(code) = &input.code {
        validate_code("code", code)?;
    }
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(method_id) = input.payment_method_id {
        ensure_method_exists(&state, user.tenant_id, method_id).await?;
    }

    let supplier = SupplierRepo::update(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: supplier }))
}

/// DELETE /api/v1/suppliers/{id}
pub async fn delete_supplier(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SupplierRepo::soft_delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

async fn ensure_method_exists(state: &AppState, tenant_id: DbId, method_id: DbId) -> AppResult<()> {
    PaymentMethodRepo::find_by_id(&state.pool, tenant_id, method_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| missing_reference("payment_method_id", method_id))
}
