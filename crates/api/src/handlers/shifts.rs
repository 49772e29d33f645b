//! Handlers for `/shifts`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::error::CoreError;
use gestora_core::shifts;
use gestora_core::types::DbId;
use gestora_core::validation::{validate_code, validate_name};
use gestora_db::models::shift::{CreateShift, ShiftView, UpdateShift};
use gestora_db::repositories::shift_repo::ShiftInput;
use gestora_db::repositories::ShiftRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::tenant::TenantUser;
use crate::query::ListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Shift";

#[derive(Debug, Deserialize)]
pub struct CurrentParams {
    /// `HH:MM` or `HH:MM:SS`.
    pub at: String,
}

/// GET /api/v1/shifts
pub async fn list_shifts(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedResponse<ShiftView>>> {
    let page = params.page_request();
    let rows = ShiftRepo::list(&state.pool, user.tenant_id, &params.filter(), &page).await?;
    Ok(Json(PaginatedResponse::map(rows, &page, ShiftView::from)))
}

/// GET /api/v1/shifts/current?at=HH:MM
///
/// Active shifts running at the given time. Overnight shifts match on both
/// sides of midnight.
pub async fn current_shifts(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<CurrentParams>,
) -> AppResult<Json<DataResponse<Vec<ShiftView>>>> {
    let at = shifts::parse_time("at", &params.at)?;
    let running = ShiftRepo::list_active(&state.pool, user.tenant_id)
        .await?
        .into_iter()
        .filter(|s| shifts::contains(s.start_time, s.end_time, at))
        .map(ShiftView::from)
        .collect();
    Ok(Json(DataResponse { data: running }))
}

/// GET /api/v1/shifts/{id}
pub async fn get_shift(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ShiftView>>> {
    let shift = ShiftRepo::find_by_id(&state.pool, user.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: shift.into() }))
}

/// POST /api/v1/shifts
pub async fn create_shift(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreateShift>,
) -> AppResult<(StatusCode, Json<DataResponse<ShiftView>>)> {
    input.validate()?;
    let shift_input = ShiftInput {
        code: input.code,
        name: input.name,
        start_time: shifts::parse_time("start_time", &input.start_time)?,
        end_time: shifts::parse_time("end_time", &input.end_time)?,
        is_active: input.is_active.unwrap_or(true),
    };
    check_shift(&shift_input)?;

    let shift = ShiftRepo::create(&state.pool, user.tenant_id, &shift_input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: shift.into() })))
}

/// PUT /api/v1/shifts/{id}
pub async fn update_shift(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateShift>,
) -> AppResult<Json<DataResponse<ShiftView>>> {
    input.validate()?;
    let current = ShiftRepo::find_by_id(&state.pool, user.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

    let start_time = match &input.start_time {
        Some(t) => shifts::parse_time("start_time", t)?,
        None => current.start_time,
    };
    let end_time = match &input.end_time {
        Some(t) => shifts::parse_time("end_time", t)?,
        None => current.end_time,
    };
    let shift_input = ShiftInput {
        code: input.code.unwrap_or(current.code),
        name: input.name.unwrap_or(current.name),
        start_time,
        end_time,
        is_active: input.is_active.unwrap_or(current.is_active),
    };
    check_shift(&shift_input)?;

    let shift = ShiftRepo::update(&state.pool, user.tenant_id, id, &shift_input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: shift.into() }))
}

/// DELETE /api/v1/shifts/{id}
pub async fn delete_shift(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ShiftRepo::soft_delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

fn check_shift(input: &ShiftInput) -> Result<(), String> {
    validate_code("code", &input.code)?;
    validate_name("name", &input.name)?;
    shifts::validate_window(input.start_time, input.end_time)
}
