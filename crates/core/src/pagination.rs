//! Page/limit pagination maths and search-pattern helpers.
//!
//! List endpoints take a 1-based `page` and a `limit`; repositories work in
//! `LIMIT`/`OFFSET`. The helpers here translate between the two and build
//! the metadata block returned next to every list.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default page size when the client does not send `limit`.
pub const DEFAULT_LIMIT: i64 = 20;

/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Clamping
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided 1-based page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Row offset of the first item on `page`.
pub fn offset_for(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

/// Number of pages needed to show `total` rows, `limit` at a time.
///
/// Zero rows means zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

// ---------------------------------------------------------------------------
// Page request / metadata
// ---------------------------------------------------------------------------

/// A resolved page request, ready to bind into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Resolve raw query parameters using the default and max limits.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: clamp_page(page),
            limit: clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        offset_for(self.page, self.limit)
    }

    /// Build the metadata block for a list that matched `total` rows.
    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            total,
            page: self.page,
            limit: self.limit,
            total_pages: total_pages(total, self.limit),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination block returned alongside list data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Escape character used in `LIKE ... ESCAPE '\'` clauses.
pub const LIKE_ESCAPE: char = '\\';

/// Turn free-text search input into a `LIKE` pattern (`%term%`).
///
/// `%`, `_` and the escape character itself are escaped so user input is
/// matched literally. Blank input yields `None` (no filter).
pub fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search?.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
    }

    #[test]
    fn clamp_limit_respects_max() {
        assert_eq!(clamp_limit(Some(500), 20, 100), 100);
    }

    #[test]
    fn clamp_limit_floors_at_one() {
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(-3), 20, 100), 1);
    }

    #[test]
    fn clamp_page_floors_at_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(7)), 7);
    }

    #[test]
    fn offset_is_zero_on_first_page() {
        assert_eq!(offset_for(1, 20), 0);
        assert_eq!(offset_for(3, 20), 40);
    }

    #[test]
    fn total_pages_is_ceiling_of_total_over_limit() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(101, 10), 11);
    }

    #[test]
    fn page_request_meta() {
        let req = PageRequest::new(Some(2), Some(10));
        assert_eq!(req.offset(), 10);
        let meta = req.meta(25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.limit, 10);
    }

    #[test]
    fn search_pattern_wraps_and_escapes() {
        assert_eq!(search_pattern(Some("grill")).as_deref(), Some("%grill%"));
        assert_eq!(search_pattern(Some("50%_off")).as_deref(), Some("%50\\%\\_off%"));
    }

    #[test]
    fn search_pattern_ignores_blank_input() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("   ")), None);
    }
}
