//! Handlers for `/sales-agents`, including the commission report.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gestora_core::error::CoreError;
use gestora_core::types::{Date, DbId};
use gestora_core::validation::{
    validate_code, validate_date_range, validate_name, validate_percentage,
};
use gestora_db::models::sales_agent::{
    CommissionReport, CreateSalesAgent, SalesAgent, UpdateSalesAgent,
};
use gestora_db::repositories::SalesAgentRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::tenant::TenantUser;
use crate::query::ListParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Sales agent";

/// `?from=&to=` for the commission report. Both ends are optional.
#[derive(Debug, Deserialize)]
pub struct CommissionParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

/// GET /api/v1/sales-agents
pub async fn list_agents(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<PaginatedResponse<SalesAgent>>> {
    let page = params.page_request();
    let agents = SalesAgentRepo::list(&state.pool, user.tenant_id, &params.filter(), &page).await?;
    Ok(Json(PaginatedResponse::new(agents, &page)))
}

/// GET /api/v1/sales-agents/{id}
pub async fn get_agent(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SalesAgent>>> {
    let agent = find_agent(&state, user.tenant_id, id).await?;
    Ok(Json(DataResponse { data: agent }))
}

/// POST /api/v1/sales-agents
pub async fn create_agent(
    State(state): State<AppState>,
    user: TenantUser,
    Json(input): Json<CreateSalesAgent>,
) -> AppResult<(StatusCode, Json<DataResponse<SalesAgent>>)> {
    input.validate()?;
    validate_code("code", &input.code)?;
    validate_name("name", &input.name)?;
    if let Some(percent) = input.commission_percent {
        validate_percentage("commission_percent", percent)?;
    }

    let agent = SalesAgentRepo::create(&state.pool, user.tenant_id, &input).await?;
    tracing::info!(agent_id = agent.id, tenant = %user.tenant, "Sales agent created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: agent })))
}

/// PUT /api/v1/sales-agents/{id}
pub async fn update_agent(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSalesAgent>,
) -> AppResult<Json<DataResponse<SalesAgent>>> {
    input.validate()?;
    if let Some(code) = &input.code {
        validate_code("code", code)?;
    }
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }
    if let Some(percent) = input.commission_percent {
        validate_percentage("commission_percent", percent)?;
    }

    let agent = SalesAgentRepo::update(&state.pool, user.tenant_id, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))?;
    Ok(Json(DataResponse { data: agent }))
}

/// DELETE /api/v1/sales-agents/{id}
pub async fn delete_agent(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SalesAgentRepo::soft_delete(&state.pool, user.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found(ENTITY, id).into())
    }
}

/// GET /api/v1/sales-agents/{id}/commissions?from=&to=
///
/// Issued and paid invoices of the agent in the range, each with the
/// commission earned on its subtotal.
pub async fn commissions(
    State(state): State<AppState>,
    user: TenantUser,
    Path(id): Path<DbId>,
    Query(params): Query<CommissionParams>,
) -> AppResult<Json<DataResponse<CommissionReport>>> {
    validate_date_range("from", params.from, "to", params.to)?;

    let agent = find_agent(&state, user.tenant_id, id).await?;
    let invoices =
        SalesAgentRepo::billed_invoices(&state.pool, user.tenant_id, id, params.from, params.to)
            .await?;

    let report = CommissionReport::build(&agent, invoices, params.from, params.to);
    Ok(Json(DataResponse { data: report }))
}

pub(crate) async fn find_agent(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<SalesAgent> {
    SalesAgentRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id).into())
}
