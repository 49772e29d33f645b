//! Route definitions for `/preferences`.

use axum::routing::get;
use axum::Router;

use crate::handlers::preferences;
use crate::state::AppState;

/// Routes mounted at `/preferences`. Scoped to the calling user.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/grids/{grid_key}",
        get(preferences::get_grid)
            .put(preferences::save_grid)
            .delete(preferences::reset_grid),
    )
}
