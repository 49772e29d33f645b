//! Handler for the work order planning calendar.

use axum::extract::{Query, State};
use axum::Json;
use gestora_core::planning::{self, build_calendar, DayBucket};
use gestora_core::types::Date;
use gestora_db::models::work_order::WorkOrder;
use gestora_db::repositories::WorkOrderRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::tenant::TenantUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlanningParams {
    pub from: Date,
    pub to: Date,
}

/// GET /api/v1/planning?from=&to=
///
/// One bucket per day of the range. An order appears on its scheduled date
/// when that falls in range, otherwise on its due date; cancelled orders
/// are left out.
pub async fn calendar(
    State(state): State<AppState>,
    user: TenantUser,
    Query(params): Query<PlanningParams>,
) -> AppResult<Json<DataResponse<Vec<DayBucket<WorkOrder>>>>> {
    planning::validate_range(params.from, params.to)?;

    let scheduled =
        WorkOrderRepo::scheduled_between(&state.pool, user.tenant_id, params.from, params.to)
            .await?;
    let due = WorkOrderRepo::due_between(&state.pool, user.tenant_id, params.from, params.to).await?;

    Ok(Json(DataResponse {
        data: build_calendar(scheduled, due, params.from, params.to),
    }))
}
