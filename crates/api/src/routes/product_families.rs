//! Route definitions for `/product-families`.

use axum::routing::get;
use axum::Router;

use crate::handlers::product_families as families;
use crate::state::AppState;

/// Routes mounted at `/product-families`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(families::list_families).post(families::create_family),
        )
        .route(
            "/{id}",
            get(families::get_family)
                .put(families::update_family)
                .delete(families::delete_family),
        )
}
