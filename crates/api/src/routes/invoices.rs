//! Route definitions for `/invoices`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::invoices;
use crate::state::AppState;

/// Routes mounted at `/invoices`.
///
/// ```text
/// GET    /                                  -> list_invoices
/// POST   /                                  -> create_invoice
/// GET    /{id}                              -> get_invoice
/// PUT    /{id}                              -> update_invoice (draft only)
/// DELETE /{id}                              -> delete_invoice (draft only)
/// PUT    /{id}/lines                        -> replace_lines
/// POST   /{id}/lines/move                   -> move_line
/// POST   /{id}/lines/{position}/duplicate   -> duplicate_line
/// POST   /{id}/issue                        -> issue_invoice
/// POST   /{id}/cancel                       -> cancel_invoice
/// GET    /{id}/due-dates                    -> due_dates
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route(
            "/{id}",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .route("/{id}/lines", put(invoices::replace_lines))
        .route("/{id}/lines/move", post(invoices::move_line))
        .route(
            "/{id}/lines/{position}/duplicate",
            post(invoices::duplicate_line),
        )
        .route("/{id}/issue", post(invoices::issue_invoice))
        .route("/{id}/cancel", post(invoices::cancel_invoice))
        .route("/{id}/due-dates", get(invoices::due_dates))
}
