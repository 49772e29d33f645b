//! Handlers for `/product-families`.
//!
//! Families form a tree. A family cannot become its own ancestor, and the
//! parent and preparation zone it points at must be live rows of the same
//! tenant.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::error::CoreError;
use gestora_core::pagination::{search_pattern, PageRequest};
use gestora_core::types::DbId;
use gestora_core::validation::{validate_code, validate_color, validate_name};
use gestora_db::models::product_family::{
    CreateProductFamily, ProductFamily, UpdateProductFamily,
};
use gestora_db::models::ListFilter;
use gestora_db::repositories::product_family_repo::FamilyFilter;
use gestora_db::repositories::{PreparationZoneRepo, ProductFamilyRepo};
use serde::Deserialize;
use validator::Validate;

use super::missing_reference;
use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantUser;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Product family";

#[derive(Debug, Deserialize)]
pub struct FamilyListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub active: Option<bool>,
    pub parent_id: Option<DbId>,
    pub preparation_zone_id: Option<DbId>,
}

/// GET /api/v1/product-families
pub async fn list_families(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<FamilyListParams>,
) -> AppResult<Json<PaginatedResponse<ProductFamily>>> {
    let page = PageRequest::new(params.page, params.limit);
    let filter = ListFilter {
        search: search_pattern(params.search.as_deref()),
        active: params.active,
    };
    let family = FamilyFilter {
        parent_id: params.parent_id,
        preparation_zone_id: params.preparation_zone_id,
    };
    let families =
        ProductFamilyRepo::list(&state.pool, user.tenant_id, &filter, &family, &page).await?;
    Ok(Json(PaginatedResponse::new(families, &page)))
}

/// GET /api/v1/product-families/{id}
pub async fn get_family(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductFamily>>> {
    let family = ProductFamilyRepo::find_by_id(&state.pool, user.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: family }))
}

/// POST /api/v1/product-families
pub async fn create_family(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreateProductFamily>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductFamily>>)> {
    input.validate()?;
    validate_code("code", &input.code)?;
    validate_name("name", &input.name)?;
    if let Some(color) = &input.color {
        validate_color(color)?;
    }
    if let Some(parent_id) = input.parent_id {
        ensure_parent_exists(&state, user.tenant_id, parent_id).await?;
    }
    if let Some(zone_id) = input.preparation_zone_id {
        ensure_zone_exists(&state, user.tenant_id, zone_id).await?;
    }

    let family = ProductFamilyRepo::create(&state.pool, user.tenant_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: family })))
}

/// PUT /api/v1/product-families/{id}
///
/// `parent_id: 0` and `preparation_zone_id: 0` detach.
pub async fn update_family(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProductFamily>,
) -> AppResult<Json<DataResponse<ProductFamily>>> {
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

    if ProductFamilyRepo::find_by_id(&state.pool, user.tenant_id, id)
        .await?
        .is_none()
    {
        return Err(CoreError::not_found(ENTITY, id).into());
    }

    if let Some(parent_id) = input.parent_id.filter(|p| *p != 0) {
        ensure_parent_exists(&state, user.tenant_id, parent_id).await?;
        // The chain from the new parent up to the root must not pass
        // through this family.
        let ancestors = ProductFamilyRepo::ancestor_ids(&state.pool, user.tenant_id, parent_id).await?;
        if ancestors.contains(&id) {
            return Err(AppError::Core(CoreError::Validation(
                "A family cannot be its own parent or a child of its descendants".into(),
            )));
        }
    }
    if let Some(zone_id) = input.preparation_zone_id.filter(|z| *z != 0) {
        ensure_zone_exists(&state, user.tenant_id, zone_id).await?;
    }

    let family = ProductFamilyRepo::update(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: family }))
}

/// DELETE /api/v1/product-families/{id}
///
/// Soft delete; direct children lose their parent.
pub async fn delete_family(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProductFamilyRepo::soft_delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

async fn ensure_parent_exists(state: &AppState, tenant_id: DbId, parent_id: DbId) -> AppResult<()> {
    ProductFamilyRepo::find_by_id(&state.pool, tenant_id, parent_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| missing_reference("parent_id", parent_id))
}

async fn ensure_zone_exists(state: &AppState, tenant_id: DbId, zone_id: DbId) -> AppResult<()> {
    if PreparationZoneRepo::exists(&state.pool, tenant_id, zone_id).await? {
        Ok(())
    } else {
        Err(missing_reference("preparation_zone_id", zone_id))
    }
}
