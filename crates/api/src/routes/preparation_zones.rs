//! Route definitions for `/preparation-zones`.

use axum::routing::get;
use axum::Router;

use crate::handlers::preparation_zones as zones;
use crate::state::AppState;

/// Routes mounted at `/preparation-zones`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(zones::list_zones).post(zones::create_zone))
        .route(
            "/{id}",
            get(zones::get_zone)
                .put(zones::update_zone)
                .delete(zones::delete_zone),
        )
}
