//! Handlers for `/invoices`.
//!
//! Invoices are created as drafts without a number. Issuing assigns the next
//! consecutive number of the series and fiscal year, after which header and
//! lines are frozen.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::document_lines::{self, compute_lines, compute_totals, LineInput};
use gestora_core::error::CoreError;
use gestora_core::invoice::{self, DEFAULT_SERIES};
use gestora_core::pagination::{search_pattern, PageRequest};
use gestora_core::payment_terms::{build_schedule, Installment, PaymentTerms};
use gestora_core::types::{Date, DbId};
use gestora_core::validation::validate_date_range;
use gestora_db::models::document_line::totals_of;
use gestora_db::models::invoice::{
    CreateInvoice, Invoice, InvoiceDetail, InvoiceFilter, MoveLineRequest, ReplaceLinesRequest,
    UpdateInvoice,
};
use gestora_db::repositories::{
    DocumentLineRepo, InvoiceRepo, LineTable, PaymentMethodRepo, SalesAgentRepo, WorkOrderRepo,
};
use serde::Deserialize;
use validator::Validate;

use super::missing_reference;
use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantUser;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Invoice";

#[derive(Debug, Deserialize)]
pub struct InvoiceListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub series: Option<String>,
    /// Issue date lower bound.
    pub from: Option<Date>,
    /// Issue date upper bound.
    pub to: Option<Date>,
    pub search: Option<String>,
}

/// GET /api/v1/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<InvoiceListParams>,
) -> AppResult<Json<PaginatedResponse<Invoice>>> {
    if let Some(status) = &params.status {
        invoice::validate_status(status)?;
    }
    validate_date_range("from", params.from, "to", params.to)?;

    let page = PageRequest::new(params.page, params.limit);
    let filter = InvoiceFilter {
        status: params.status,
        series: params.series,
        from: params.from,
        to: params.to,
        search: search_pattern(params.search.as_deref()),
    };
    let invoices = InvoiceRepo::list(&state.pool, user.tenant_id, &filter, &page).await?;
    Ok(Json(PaginatedResponse::new(invoices, &page)))
}

/// GET /api/v1/invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    Ok(Json(DataResponse {
        data: invoice_detail(&state, user.tenant_id, id).await?,
    }))
}

/// POST /api/v1/invoices
///
/// Creates a draft. Without an explicit `due_date`, the payment method's
/// last instalment date is used.
pub async fn create_invoice(
    State(state): State<AppState>,
    user: TenantUser,
    Json(mut input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<DataResponse<InvoiceDetail>>)> {
    input.validate()?;
    let series = input
        .series
        .clone()
        .unwrap_or_else(|| DEFAULT_SERIES.to_string());
    invoice::validate_series(&series)?;
    validate_date_range("issue_date", Some(input.issue_date), "due_date", input.due_date)?;

    if let Some(method_id) = input.payment_method_id {
        let terms = method_terms(&state, user.tenant_id, method_id).await?;
        if input.due_date.is_none() {
            input.due_date = Some(terms.final_due_date(input.issue_date));
        }
    }
    if let Some(agent_id) = input.sales_agent_id {
        ensure_agent_exists(&state, user.tenant_id, agent_id).await?;
    }
    if let Some(order_id) = input.work_order_id {
        if WorkOrderRepo::find_by_id(&state.pool, user.tenant_id, order_id)
            .await?
            .is_none()
        {
            return Err(missing_reference("work_order_id", order_id));
        }
    }

    let lines = compute_lines(&input.lines)?;
    let totals = compute_totals(&lines);
    let created =
        InvoiceRepo::create(&state.pool, user.tenant_id, &input, &series, &lines, &totals).await?;

    let detail = invoice_detail(&state, user.tenant_id, created.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/invoices/{id}
pub async fn update_invoice(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInvoice>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    input.validate()?;
    if let Some(series) = &input.series {
        invoice::validate_series(series)?;
    }
    let current = find_invoice(&state, user.tenant_id, id).await?;
    ensure_draft(&current)?;

    validate_date_range(
        "issue_date",
        Some(input.issue_date.unwrap_or(current.issue_date)),
        "due_date",
        input.due_date.or(current.due_date),
    )?;
    if let Some(method_id) = input.payment_method_id {
        method_terms(&state, user.tenant_id, method_id).await?;
    }
    if let Some(agent_id) = input.sales_agent_id {
        ensure_agent_exists(&state, user.tenant_id, agent_id).await?;
    }

    let updated = InvoiceRepo::update_draft(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| not_a_draft(&current))?;
    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/invoices/{id}/lines
pub async fn replace_lines(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReplaceLinesRequest>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    let current = find_invoice(&state, user.tenant_id, id).await?;
    ensure_draft(&current)?;
    store_lines(&state, user.tenant_id, &current, &input.lines).await?;
    Ok(Json(DataResponse {
        data: invoice_detail(&state, user.tenant_id, id).await?,
    }))
}

/// POST /api/v1/invoices/{id}/lines/{position}/duplicate
///
/// Inserts a copy of the line right after it; later lines shift down.
pub async fn duplicate_line(
    State(state): State<AppState>,
    user: TenantUser,
    Path((id, position)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    let current = find_invoice(&state, user.tenant_id, id).await?;
    ensure_draft(&current)?;

    let mut inputs = current_inputs(&state, id).await?;
    document_lines::duplicate_line(&mut inputs, position)?;
    store_lines(&state, user.tenant_id, &current, &inputs).await?;
    Ok(Json(DataResponse {
        data: invoice_detail(&state, user.tenant_id, id).await?,
    }))
}

/// POST /api/v1/invoices/{id}/lines/move
pub async fn move_line(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<MoveLineRequest>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    let current = find_invoice(&state, user.tenant_id, id).await?;
    ensure_draft(&current)?;

    let mut inputs = current_inputs(&state, id).await?;
    document_lines::move_line(&mut inputs, input.from, input.to)?;
    store_lines(&state, user.tenant_id, &current, &inputs).await?;
    Ok(Json(DataResponse {
        data: invoice_detail(&state, user.tenant_id, id).await?,
    }))
}

/// POST /api/v1/invoices/{id}/issue
pub async fn issue_invoice(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    let current = find_invoice(&state, user.tenant_id, id).await?;
    if !invoice::can_issue(&current.status) {
        return Err(not_a_draft(&current));
    }
    if DocumentLineRepo::list(&state.pool, LineTable::Invoice, id)
        .await?
        .is_empty()
    {
        return Err(AppError::Core(CoreError::Validation(
            "An invoice without lines cannot be issued".into(),
        )));
    }

    let issued = InvoiceRepo::issue(&state.pool, user.tenant_id, id)
        .await?
        .ok_or_else(|| not_a_draft(&current))?;
    tracing::info!(
        tenant_id = user.tenant_id,
        invoice_id = issued.id,
        code = issued.code.as_deref().unwrap_or_default(),
        total = issued.total,
        "Invoice issued"
    );

    Ok(Json(DataResponse {
        data: invoice_detail(&state, user.tenant_id, id).await?,
    }))
}

/// POST /api/v1/invoices/{id}/cancel
///
/// Issued invoices keep their number so the series has no gaps.
pub async fn cancel_invoice(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let current = find_invoice(&state, user.tenant_id, id).await?;
    if !invoice::can_cancel(&current.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Invoice {id} is {} and cannot be cancelled",
            current.status
        ))));
    }

    let cancelled = InvoiceRepo::cancel(&state.pool, user.tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    tracing::info!(tenant_id = user.tenant_id, invoice_id = id, "Invoice cancelled");
    Ok(Json(DataResponse { data: cancelled }))
}

/// DELETE /api/v1/invoices/{id}
///
/// Only drafts can be deleted; issued invoices must be cancelled instead.
pub async fn delete_invoice(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let current = find_invoice(&state, user.tenant_id, id).await?;
    ensure_draft(&current)?;

    if InvoiceRepo::delete_draft(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_a_draft(&current))
    }
}

/// GET /api/v1/invoices/{id}/due-dates
///
/// Instalments of the invoice total under its payment method's terms.
/// Invoices without a method fall due in full on the issue date.
pub async fn due_dates(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Installment>>>> {
    let current = find_invoice(&state, user.tenant_id, id).await?;
    let terms = match current.payment_method_id {
        Some(method_id) => PaymentMethodRepo::find_by_id(&state.pool, user.tenant_id, method_id)
            .await?
            .map(|m| m.terms())
            .unwrap_or(PaymentTerms::IMMEDIATE),
        None => PaymentTerms::IMMEDIATE,
    };
    let installments = build_schedule(&terms, current.total, current.issue_date)?;
    Ok(Json(DataResponse { data: installments }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_invoice(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<Invoice> {
    InvoiceRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id).into())
}

/// Load an invoice with its lines and recomputed tax breakdown.
pub(crate) async fn invoice_detail(
    state: &AppState,
    tenant_id: DbId,
    id: DbId,
) -> AppResult<InvoiceDetail> {
    let invoice = find_invoice(state, tenant_id, id).await?;
    let lines = DocumentLineRepo::list(&state.pool, LineTable::Invoice, id).await?;
    let totals = totals_of(&lines);
    Ok(InvoiceDetail { invoice, lines, totals })
}

pub(crate) async fn ensure_agent_exists(
    state: &AppState,
    tenant_id: DbId,
    agent_id: DbId,
) -> AppResult<()> {
    SalesAgentRepo::find_by_id(&state.pool, tenant_id, agent_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| missing_reference("sales_agent_id", agent_id))
}

async fn method_terms(state: &AppState, tenant_id: DbId, method_id: DbId) -> AppResult<PaymentTerms> {
    PaymentMethodRepo::find_by_id(&state.pool, tenant_id, method_id)
        .await?
        .map(|m| m.terms())
        .ok_or_else(|| missing_reference("payment_method_id", method_id))
}

async fn current_inputs(state: &AppState, id: DbId) -> AppResult<Vec<LineInput>> {
    let lines = DocumentLineRepo::list(&state.pool, LineTable::Invoice, id).await?;
    Ok(lines.iter().map(|l| l.to_input()).collect())
}

async fn store_lines(
    state: &AppState,
    tenant_id: DbId,
    current: &Invoice,
    inputs: &[LineInput],
) -> AppResult<()> {
    let lines = compute_lines(inputs)?;
    let totals = compute_totals(&lines);
    if InvoiceRepo::replace_lines(&state.pool, tenant_id, current.id, &lines, &totals).await? {
        Ok(())
    } else {
        Err(not_a_draft(current))
    }
}

fn ensure_draft(current: &Invoice) -> AppResult<()> {
    if invoice::is_editable(&current.status) {
        Ok(())
    } else {
        Err(not_a_draft(current))
    }
}

fn not_a_draft(current: &Invoice) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Invoice {} is {}; only drafts can be changed",
        current.id, current.status
    )))
}
