//! Route definitions for `/shifts`.

use axum::routing::get;
use axum::Router;

use crate::handlers::shifts;
use crate::state::AppState;

/// Routes mounted at `/shifts`.
///
/// ```text
/// GET    /           -> list_shifts
/// POST   /           -> create_shift
/// GET    /current    -> current_shifts (?at=HH:MM)
/// GET    /{id}       -> get_shift
/// PUT    /{id}       -> update_shift
/// DELETE /{id}       -> delete_shift
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(shifts::list_shifts).post(shifts::create_shift))
        .route("/current", get(shifts::current_shifts))
        .route(
            "/{id}",
            get(shifts::get_shift)
                .put(shifts::update_shift)
                .delete(shifts::delete_shift),
        )
}
