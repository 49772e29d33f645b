//! Route definitions for `/stock-movements`.

use axum::routing::get;
use axum::Router;

use crate::handlers::stock_movements as movements;
use crate::state::AppState;

/// Routes mounted at `/stock-movements`.
///
/// ```text
/// GET    /          -> list_movements
/// POST   /          -> create_movement
/// GET    /levels    -> levels (?warehouse&product_code)
/// GET    /{id}      -> get_movement
/// PUT    /{id}      -> update_movement
/// DELETE /{id}      -> delete_movement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(movements::list_movements).post(movements::create_movement),
        )
        .route("/levels", get(movements::levels))
        .route(
            "/{id}",
            get(movements::get_movement)
                .put(movements::update_movement)
                .delete(movements::delete_movement),
        )
}
