//! Route definitions for `/payment-methods`.

use axum::routing::get;
use axum::Router;

use crate::handlers::payment_methods as methods;
use crate::state::AppState;

/// Routes mounted at `/payment-methods`.
///
/// ```text
/// GET    /                 -> list_methods
/// POST   /                 -> create_method
/// GET    /{id}             -> get_method
/// PUT    /{id}             -> update_method
/// DELETE /{id}             -> delete_method
/// GET    /{id}/schedule    -> schedule (?amount&date)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(methods::list_methods).post(methods::create_method))
        .route(
            "/{id}",
            get(methods::get_method)
                .put(methods::update_method)
                .delete(methods::delete_method),
        )
        .route("/{id}/schedule", get(methods::schedule))
}
