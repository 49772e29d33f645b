//! Route definitions for `/sales-agents`.

use axum::routing::get;
use axum::Router;

use crate::handlers::sales_agents as agents;
use crate::state::AppState;

/// Routes mounted at `/sales-agents`.
///
/// ```text
/// GET    /                    -> list_agents
/// POST   /                    -> create_agent
/// GET    /{id}                -> get_agent
/// PUT    /{id}                -> update_agent
/// DELETE /{id}                -> delete_agent
/// GET    /{id}/commissions    -> commissions (?from&to)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(agents::list_agents).post(agents::create_agent))
        .route(
            "/{id}",
            get(agents::get_agent)
                .put(agents::update_agent)
                .delete(agents::delete_agent),
        )
        .route("/{id}/commissions", get(agents::commissions))
}
