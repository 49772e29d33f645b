//! Handlers for `/work-orders`.
//!
//! Orders move through `pending -> in_progress -> completed -> invoiced`,
//! with `cancelled` reachable until invoicing. Header and lines can only be
//! edited while the order is pending or in progress.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use gestora_core::document_lines::{compute_lines, compute_totals};
use gestora_core::error::CoreError;
use gestora_core::invoice::{self as invoice_rules, DEFAULT_SERIES};
use gestora_core::pagination::{search_pattern, PageRequest};
use gestora_core::types::{Date, DbId};
use gestora_core::validation::validate_date_range;
use gestora_core::work_order::{self, STATUS_COMPLETED};
use gestora_db::models::document_line::totals_of;
use gestora_db::models::invoice::{CreateInvoice, InvoiceDetail, ReplaceLinesRequest};
use gestora_db::models::work_order::{
    ChangeStatusRequest, CreateWorkOrder, InvoiceWorkOrderRequest, UpdateWorkOrder, WorkOrder,
    WorkOrderDetail, WorkOrderFilter,
};
use gestora_db::repositories::{DocumentLineRepo, LineTable, PaymentMethodRepo, WorkOrderRepo};
use serde::Deserialize;
use validator::Validate;

use super::invoices::{ensure_agent_exists, invoice_detail};
use super::missing_reference;
use crate::error::{AppError, AppResult};
use crate::middleware::tenant::TenantUser;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Work order";

#[derive(Debug, Deserialize)]
pub struct WorkOrderListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    /// Scheduled date lower bound.
    pub from: Option<Date>,
    /// Scheduled date upper bound.
    pub to: Option<Date>,
    pub search: Option<String>,
}

/// GET /api/v1/work-orders
pub async fn list_orders(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<WorkOrderListParams>,
) -> AppResult<Json<PaginatedResponse<WorkOrder>>> {
    if let Some(status) = &params.status {
        work_order::validate_status(status)?;
    }
    validate_date_range("from", params.from, "to", params.to)?;

    let page = PageRequest::new(params.page, params.limit);
    let filter = WorkOrderFilter {
        status: params.status,
        from: params.from,
        to: params.to,
        search: search_pattern(params.search.as_deref()),
    };
    let orders = WorkOrderRepo::list(&state.pool, user.tenant_id, &filter, &page).await?;
    Ok(Json(PaginatedResponse::new(orders, &page)))
}

/// GET /api/v1/work-orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkOrderDetail>>> {
    let order = find_order(&state, user.tenant_id, id).await?;
    Ok(Json(DataResponse {
        data: order_detail(&state, order).await?,
    }))
}

/// POST /api/v1/work-orders
///
/// The number (`PT-000001`, ...) is assigned by the server.
pub async fn create_order(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreateWorkOrder>,
) -> AppResult<(StatusCode, Json<DataResponse<WorkOrderDetail>>)> {
    input.validate()?;
    validate_date_range("scheduled_date", input.scheduled_date, "due_date", input.due_date)?;
    if let Some(agent_id) = input.sales_agent_id {
        ensure_agent_exists(&state, user.tenant_id, agent_id).await?;
    }

    let lines = compute_lines(&input.lines)?;
    let totals = compute_totals(&lines);
    let order = WorkOrderRepo::create(&state.pool, user.tenant_id, &input, &lines, &totals).await?;

    tracing::info!(
        tenant_id = user.tenant_id,
        work_order = %order.number,
        "Work order created"
    );
    let detail = order_detail(&state, order).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/work-orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkOrder>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    input.validate()?;
    let current = find_order(&state, user.tenant_id, id).await?;
    ensure_editable(&current)?;

    validate_date_range(
        "scheduled_date",
        input.scheduled_date.or(current.scheduled_date),
        "due_date",
        input.due_date.or(current.due_date),
    )?;
    if let Some(agent_id) = input.sales_agent_id {
        ensure_agent_exists(&state, user.tenant_id, agent_id).await?;
    }

    let order = WorkOrderRepo::update(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: order }))
}

/// PUT /api/v1/work-orders/{id}/lines
///
/// Replaces every line and recomputes the totals.
pub async fn replace_lines(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReplaceLinesRequest>,
) -> AppResult<Json<DataResponse<WorkOrderDetail>>> {
    let current = find_order(&state, user.tenant_id, id).await?;
    ensure_editable(&current)?;

    let lines = compute_lines(&input.lines)?;
    let totals = compute_totals(&lines);
    if !WorkOrderRepo::replace_lines(&state.pool, user.tenant_id, id, &lines, &totals).await? {
        return Err(CoreError::not_found(ENTITY, id).into());
    }

    let order = find_order(&state, user.tenant_id, id).await?;
    Ok(Json(DataResponse {
        data: order_detail(&state, order).await?,
    }))
}

/// POST /api/v1/work-orders/{id}/status
///
/// `invoiced` is only reachable through `POST /work-orders/{id}/invoice`.
pub async fn change_status(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeStatusRequest>,
) -> AppResult<Json<DataResponse<WorkOrder>>> {
    work_order::validate_status(&input.status)?;
    let current = find_order(&state, user.tenant_id, id).await?;
    if !work_order::can_transition(&current.status, &input.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Cannot change work order {} from '{}' to '{}'",
            current.number, current.status, input.status
        ))));
    }

    let completed_date = (input.status == STATUS_COMPLETED)
        .then(|| input.completed_date.unwrap_or_else(|| Utc::now().date_naive()));
    let order = WorkOrderRepo::set_status(
        &state.pool,
        user.tenant_id,
        id,
        &input.status,
        completed_date,
    )
    .await?
    .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

    tracing::info!(
        tenant_id = user.tenant_id,
        work_order = %order.number,
        from = %current.status,
        to = %order.status,
        "Work order status changed"
    );
    Ok(Json(DataResponse { data: order }))
}

/// DELETE /api/v1/work-orders/{id}
///
/// Only pending or cancelled orders can be deleted.
pub async fn delete_order(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let current = find_order(&state, user.tenant_id, id).await?;
    if !work_order::is_deletable(&current.status) {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Work order {} is {} and cannot be deleted",
            current.number, current.status
        ))));
    }

    if WorkOrderRepo::delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

/// POST /api/v1/work-orders/{id}/invoice
///
/// Turns a completed order into a draft invoice carrying its customer,
/// agent and lines, and marks the order invoiced.
pub async fn invoice_order(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    body: Option<Json<InvoiceWorkOrderRequest>>,
) -> AppResult<(StatusCode, Json<DataResponse<InvoiceDetail>>)> {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let order = find_order(&state, user.tenant_id, id).await?;
    if order.status != STATUS_COMPLETED {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Work order {} is {}; only completed orders can be invoiced",
            order.number, order.status
        ))));
    }

    let series = request.series.unwrap_or_else(|| DEFAULT_SERIES.to_string());
    invoice_rules::validate_series(&series)?;
    let issue_date = request.issue_date.unwrap_or_else(|| Utc::now().date_naive());
    let due_date = match request.payment_method_id {
        Some(method_id) => {
            let method = PaymentMethodRepo::find_by_id(&state.pool, user.tenant_id, method_id)
                .await?
                .ok_or_else(|| missing_reference("payment_method_id", method_id))?;
            Some(method.terms().final_due_date(issue_date))
        }
        None => None,
    };

    let stored = DocumentLineRepo::list(&state.pool, LineTable::WorkOrder, order.id).await?;
    let inputs: Vec<_> = stored.iter().map(|l| l.to_input()).collect();
    let lines = compute_lines(&inputs)?;
    let totals = compute_totals(&lines);

    let header = CreateInvoice {
        series: Some(series.clone()),
        issue_date,
        due_date,
        customer_name: order.customer_name.clone(),
        customer_tax_id: None,
        customer_address: None,
        payment_method_id: request.payment_method_id,
        sales_agent_id: order.sales_agent_id,
        work_order_id: Some(order.id),
        notes: Some(format!("Work order {}", order.number)),
        lines: inputs,
    };

    let invoice_id = WorkOrderRepo::convert_to_invoice(
        &state.pool,
        user.tenant_id,
        order.id,
        &header,
        &series,
        &lines,
        &totals,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(format!(
            "Work order {} is no longer completed",
            order.number
        )))
    })?;

    tracing::info!(
        tenant_id = user.tenant_id,
        work_order = %order.number,
        invoice_id,
        "Work order invoiced"
    );
    let detail = invoice_detail(&state, user.tenant_id, invoice_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

async fn find_order(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<WorkOrder> {
    WorkOrderRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id).into())
}

async fn order_detail(state: &AppState, order: WorkOrder) -> AppResult<WorkOrderDetail> {
    let lines = DocumentLineRepo::list(&state.pool, LineTable::WorkOrder, order.id).await?;
    let totals = totals_of(&lines);
    Ok(WorkOrderDetail { order, lines, totals })
}

fn ensure_editable(order: &WorkOrder) -> AppResult<()> {
    if work_order::is_editable(&order.status) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Conflict(format!(
            "Work order {} is {} and can no longer be edited",
            order.number, order.status
        ))))
    }
}
