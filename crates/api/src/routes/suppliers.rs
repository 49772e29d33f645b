//! Route definitions for `/suppliers`.

use axum::routing::get;
use axum::Router;

use crate::handlers::suppliers;
use crate::state::AppState;

/// Routes mounted at `/suppliers`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/{id}",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .delete(suppliers::delete_supplier),
        )
}
