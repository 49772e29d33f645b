//! Handlers for `/bank-movements`: CRUD, summary and reconciliation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::bank::{self, MovementSummary};
use gestora_core::error::CoreError;
use gestora_core::invoice;
use gestora_core::pagination::{search_pattern, PageRequest};
use gestora_core::types::{Date, DbId};
use gestora_core::validation::validate_date_range;
use gestora_db::models::bank_movement::{
    BankMovement, BankMovementFilter, CreateBankMovement, ReconcileRequest, UpdateBankMovement,
};
use gestora_db::repositories::bank_movement_repo::Reconciliation;
use gestora_db::repositories::{BankMovementRepo, InvoiceRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantUser;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Bank movement";

#[derive(Debug, Deserialize)]
pub struct MovementListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub account: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub reconciled: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub account: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

/// GET /api/v1/bank-movements
///
/// Newest first. `search` matches concept and reference.
pub async fn list_movements(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<MovementListParams>,
) -> AppResult<Json<PaginatedResponse<BankMovement>>> {
    validate_date_range("from", params.from, "to", params.to)?;
    let page = PageRequest::new(params.page, params.limit);
    let filter = BankMovementFilter {
        account: params.account,
        from: params.from,
        to: params.to,
        reconciled: params.reconciled,
        search: search_pattern(params.search.as_deref()),
    };
    let movements = BankMovementRepo::list(&state.pool, user.tenant_id, &filter, &page).await?;
    Ok(Json(PaginatedResponse::new(movements, &page)))
}

/// GET /api/v1/bank-movements/summary
///
/// Income, expense, net and count over the filtered movements.
pub async fn summary(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<SummaryParams>,
) -> AppResult<Json<DataResponse<MovementSummary>>> {
    validate_date_range("from", params.from, "to", params.to)?;
    let filter = BankMovementFilter {
        account: params.account,
        from: params.from,
        to: params.to,
        ..Default::default()
    };
    let summary = BankMovementRepo::summary(&state.pool, user.tenant_id, &filter).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/bank-movements/{id}
pub async fn get_movement(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BankMovement>>> {
    let movement = find_movement(&state, user.tenant_id, id).await?;
    Ok(Json(DataResponse { data: movement }))
}

/// POST /api/v1/bank-movements
pub async fn create_movement(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreateBankMovement>,
) -> AppResult<(StatusCode, Json<DataResponse<BankMovement>>)> {
    input.validate()?;
    bank::validate_account(&input.account)?;
    bank::validate_amount(input.amount)?;

    let movement = BankMovementRepo::create(&state.pool, user.tenant_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: movement })))
}

/// PUT /api/v1/bank-movements/{id}
///
/// Reconciled movements are frozen.
pub async fn update_movement(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBankMovement>,
) -> AppResult<Json<DataResponse<BankMovement>>> {
    input.validate()?;
    if let Some(account) = &input.account {
        bank::validate_account(account)?;
    }
    if let Some(amount) = input.amount {
        bank::validate_amount(amount)?;
    }

    let current = find_movement(&state, user.tenant_id, id).await?;
    if current.reconciled {
        return Err(AppError::Core(CoreError::Conflict(
            "A reconciled movement cannot be edited".into(),
        )));
    }

    let movement = BankMovementRepo::update(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: movement }))
}

/// DELETE /api/v1/bank-movements/{id}
///
/// Reconciled movements back an invoice payment and cannot be removed.
pub async fn delete_movement(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let current = find_movement(&state, user.tenant_id, id).await?;
    if current.reconciled {
        return Err(AppError::Core(CoreError::Conflict(
            "A reconciled movement cannot be deleted".into(),
        )));
    }

    if BankMovementRepo::delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

/// POST /api/v1/bank-movements/{id}/reconcile
///
/// Link the movement to an issued invoice. Once the reconciled movements
/// cover the invoice total, the invoice becomes `paid`.
pub async fn reconcile(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReconcileRequest>,
) -> AppResult<Json<DataResponse<Reconciliation>>> {
    let movement = find_movement(&state, user.tenant_id, id).await?;
    if movement.reconciled {
        return Err(already_reconciled());
    }

    let target = InvoiceRepo::find_by_id(&state.pool, user.tenant_id, input.invoice_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Invoice", input.invoice_id))?;
    if !invoice::accepts_payments(&target.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Invoice in status '{}' does not accept payments",
            target.status
        ))));
    }

    let outcome =
        BankMovementRepo::reconcile(&state.pool, user.tenant_id, id, target.id, target.total)
            .await?
            .ok_or_else(already_reconciled)?;

    tracing::info!(
        movement_id = id,
        invoice_id = target.id,
        invoice_paid = outcome.invoice_paid,
        "Bank movement reconciled"
    );
    Ok(Json(DataResponse { data: outcome }))
}

async fn find_movement(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<BankMovement> {
    BankMovementRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id).into())
}

fn already_reconciled() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Movement is already reconciled".into(),
    ))
}
