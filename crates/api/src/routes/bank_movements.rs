//! Route definitions for `/bank-movements`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bank_movements as movements;
use crate::state::AppState;

/// Routes mounted at `/bank-movements`.
///
/// ```text
/// GET    /                  -> list_movements
/// POST   /                  -> create_movement
/// GET    /summary           -> summary (?account&from&to)
/// GET    /{id}              -> get_movement
/// PUT    /{id}              -> update_movement
/// DELETE /{id}              -> delete_movement
/// POST   /{id}/reconcile    -> reconcile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(movements::list_movements).post(movements::create_movement),
        )
        .route("/summary", get(movements::summary))
        .route(
            "/{id}",
            get(movements::get_movement)
                .put(movements::update_movement)
                .delete(movements::delete_movement),
        )
        .route("/{id}/reconcile", post(movements::reconcile))
}
