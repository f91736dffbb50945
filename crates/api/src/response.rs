//! Shared response envelope types for API handlers.
//!
//! Plain responses use a `{ "data": ... }` envelope; list endpoints add the
//! paging fields alongside it.

use serde::Serialize;
use welfare_core::listing::{ListQuery, Page};

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "total_count", "page", "page_size", "total_pages" }`.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn new(page: Page<T>, query: &ListQuery) -> Self {
        Self {
            total_pages: page.total_pages(query.page_size),
            total_count: page.total_count,
            data: page.rows,
            page: query.page,
            page_size: query.page_size,
        }
    }
}
