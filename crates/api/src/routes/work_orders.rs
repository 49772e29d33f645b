//! Route definitions for `/work-orders` and `/planning`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{planning, work_orders as orders};
use crate::state::AppState;

/// Routes mounted at `/work-orders`.
///
/// ```text
/// GET    /                -> list_orders
/// POST   /                -> create_order
/// GET    /{id}            -> get_order
/// PUT    /{id}            -> update_order
/// DELETE /{id}            -> delete_order
/// PUT    /{id}/lines      -> replace_lines
/// POST   /{id}/status     -> change_status
/// POST   /{id}/invoice    -> invoice_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route(
            "/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/{id}/lines", put(orders::replace_lines))
        .route("/{id}/status", post(orders::change_status))
        .route("/{id}/invoice", post(orders::invoice_order))
}

/// Routes mounted at `/planning`.
pub fn planning_router() -> Router<AppState> {
    Router::new().route("/", get(planning::calendar))
}
