//! Shared query parameter types for API handlers.

use gestora_core::pagination::{search_pattern, PageRequest};
use gestora_db::models::ListFilter;
use serde::Deserialize;

/// `?page=&limit=&search=&active=` accepted by every master-data list.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub active: Option<bool>,
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    pub fn filter(&self) -> ListFilter {
        ListFilter {
            search: search_pattern(self.search.as_deref()),
            active: self.active,
        }
    }
}
