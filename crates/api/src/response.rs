//! Shared response envelope types for API handlers.
//!
//! Single items use `{ "data": ... }`; lists add a `pagination` block.

use gestora_core::pagination::{PageRequest, PaginationMeta};
use gestora_db::models::Page;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: zone }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "pagination": {...} }` envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(page: Page<T>, request: &PageRequest) -> Self {
        Self {
            pagination: request.meta(page.total),
            data: page.items,
        }
    }

    /// Build from a page whose rows need converting first.
    pub fn map<S, F>(page: Page<S>, request: &PageRequest, f: F) -> Self
    where
        F: FnMut(S) -> T,
    {
        Self {
            pagination: request.meta(page.total),
            data: page.items.into_iter().map(f).collect(),
        }
    }
}
