//! Route definitions for `/price-lists` and their items.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::price_lists;
use crate::state::AppState;

/// Routes mounted at `/price-lists`.
///
/// ```text
/// GET    /                        -> list_price_lists
/// POST   /                        -> create_price_list
/// GET    /{id}                    -> get_price_list
/// PUT    /{id}                    -> update_price_list
/// DELETE /{id}                    -> delete_price_list
/// POST   /{id}/reprice            -> reprice_list
/// GET    /{id}/items              -> list_items
/// POST   /{id}/items              -> upsert_item
/// GET    /{id}/items/{item_id}    -> get_item
/// PUT    /{id}/items/{item_id}    -> update_item
/// DELETE /{id}/items/{item_id}    -> delete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(price_lists::list_price_lists).post(price_lists::create_price_list),
        )
        .route(
            "/{id}",
            get(price_lists::get_price_list)
                .put(price_lists::update_price_list)
                .delete(price_lists::delete_price_list),
        )
        .route("/{id}/reprice", post(price_lists::reprice_list))
        .route(
            "/{id}/items",
            get(price_lists::list_items).post(price_lists::upsert_item),
        )
        .route(
            "/{id}/items/{item_id}",
            get(price_lists::get_item)
                .put(price_lists::update_item)
                .delete(price_lists::delete_item),
        )
}
