//! Handlers for `/payment-methods` and their instalment schedules.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use gestora_core::error::CoreError;
use gestora_core::payment_terms::{self, build_schedule, Installment, PaymentTerms};
use gestora_core::types::{Date, DbId};
use gestora_core::validation::{validate_code, validate_name};
use gestora_db::models::payment_method::{
    CreatePaymentMethod, PaymentMethod, UpdatePaymentMethod,
};
use gestora_db::repositories::PaymentMethodRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantUser;
use crate::query::ListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Payment method";

#[derive(Debug, Deserialize)]
pub struct ScheduleParams {
    pub amount: f64,
    /// Document date; defaults to today.
    pub date: Option<Date>,
}

/// GET /api/v1/payment-methods
pub async fn list_methods(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedResponse<PaymentMethod>>> {
    let page = params.page_request();
    let methods =
        PaymentMethodRepo::list(&state.pool, user.tenant_id, &params.filter(), &page).await?;
    Ok(Json(PaginatedResponse::new(methods, &page)))
}

/// GET /api/v1/payment-methods/{id}
pub async fn get_method(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PaymentMethod>>> {
    let method = find_method(&state, user.tenant_id, id).await?;
    Ok(Json(DataResponse { data: method }))
}

/// POST /api/v1/payment-methods
pub async fn create_method(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreatePaymentMethod>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentMethod>>)> {
    input.validate()?;
    validate_code("code", &input.code)?;
    validate_name("name", &input.name)?;
    payment_terms::validate_kind(&input.kind)?;
    PaymentTerms {
        installments: input.installments.unwrap_or(PaymentTerms::IMMEDIATE.installments),
        first_due_days: input.first_due_days.unwrap_or(PaymentTerms::IMMEDIATE.first_due_days),
        days_between: input.days_between.unwrap_or(PaymentTerms::IMMEDIATE.days_between),
    }
    .validate()?;
    if let Some(surcharge) = input.surcharge_percent {
        payment_terms::validate_surcharge(surcharge)?;
    }

    let method = PaymentMethodRepo::create(&state.pool, user.tenant_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: method })))
}

/// PUT /api/v1/payment-methods/{id}
///
/// Instalment terms are validated after merging with the stored values.
pub async fn update_method(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePaymentMethod>,
) -> AppResult<Json<DataResponse<PaymentMethod>>> {
    input.validate()?;
    if let Some(code) = &input.code {
        validate_code("code", code)?;
    }
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(kind) = &input.kind {
        payment_terms::validate_kind(kind)?;
    }
    if let Some(surcharge) = input.surcharge_percent {
        payment_terms::validate_surcharge(surcharge)?;
    }

    let current = find_method(&state, user.tenant_id, id).await?;
    PaymentTerms {
        installments: input.installments.unwrap_or(current.installments),
        first_due_days: input.first_due_days.unwrap_or(current.first_due_days),
        days_between: input.days_between.unwrap_or(current.days_between),
    }
    .validate()?;

    let method = PaymentMethodRepo::update(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: method }))
}

/// DELETE /api/v1/payment-methods/{id}
///
/// Refused with 409 while a supplier or an invoice still uses the method.
pub async fn delete_method(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_method(&state, user.tenant_id, id).await?;
    if PaymentMethodRepo::is_referenced(&state.pool, user.tenant_id, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Payment method is used by suppliers or invoices".into(),
        )));
    }

    if PaymentMethodRepo::soft_delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

/// GET /api/v1/payment-methods/{id}/schedule?amount=&date=
pub async fn schedule(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Query(params): Query<ScheduleParams>,
) -> AppResult<Json<DataResponse<Vec<Installment>>>> {
    let method = find_method(&state, user.tenant_id, id).await?;
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let installments = build_schedule(&method.terms(), params.amount, date)?;
    Ok(Json(DataResponse { data: installments }))
}

pub(crate) async fn find_method(
    state: &AppState,
    tenant_id: DbId,
    id: DbId,
) -> AppResult<PaymentMethod> {
    PaymentMethodRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id).into())
}
