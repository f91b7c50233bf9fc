//! Pagination types for list endpoints.

use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};

/// Pagination query parameters (1-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }.normalized()
    }

    /// Page clamped to [1, MAX_PAGE_NUMBER], limit to [1, MAX_PAGE_SIZE]
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.clamp(1, MAX_PAGE_NUMBER),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Calculate offset for slicing
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of items with its position in the whole result
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(params: PaginationParams, total: u64) -> Self {
        let total_pages = total.div_ceil(params.limit.max(1));
        Self {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
            has_next: params.page < total_pages,
            has_prev: params.page > 1,
        }
    }
}

impl<T> Paginated<T> {
    /// Wrap a page that was already cut by the store
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(params, total),
        }
    }

    /// Cut one page out of a fully materialized list
    pub fn from_all(items: Vec<T>, params: PaginationParams) -> Self {
        let total = items.len() as u64;
        let data = items
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit as usize)
            .collect();
        Self::new(data, params, total)
    }

    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[derive(Serialize)]
struct PageBody<T> {
    success: bool,
    data: Vec<T>,
    pagination: PaginationMeta,
}

impl<T: Serialize> IntoResponse for Paginated<T> {
    fn into_response(self) -> axum::response::Response {
        Json(PageBody {
            success: true,
            data: self.data,
            pagination: self.pagination,
        })
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_clamped() {
        let params = PaginationParams::new(0, 500);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, MAX_PAGE_SIZE);

        let params = PaginationParams::new(3, 0);
        assert_eq!(params.limit, 1);
    }

    #[test]
    fn huge_page_neither_overflows_nor_wraps() {
        let params = PaginationParams::new(u64::MAX, MAX_PAGE_SIZE);
        assert_eq!(params.page, MAX_PAGE_NUMBER);

        let raw = PaginationParams {
            page: u64::MAX,
            limit: MAX_PAGE_SIZE,
        };
        assert_eq!(raw.offset(), u64::MAX);

        let page = Paginated::from_all((1..=5).collect::<Vec<u32>>(), raw);
        assert!(page.data.is_empty());
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn first_page_has_next_but_no_prev() {
        let page = Paginated::from_all((1..=25).collect::<Vec<u32>>(), PaginationParams::new(1, 10));
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next);
        assert!(!page.pagination.has_prev);
    }

    #[test]
    fn last_page_is_partial() {
        let page = Paginated::from_all((1..=25).collect::<Vec<u32>>(), PaginationParams::new(3, 10));
        assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page = Paginated::from_all(Vec::<u32>::new(), PaginationParams::default());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn meta_serializes_camel_case() {
        let meta = PaginationMeta::new(PaginationParams::new(2, 5), 11);
        let json = serde_json::to_value(meta).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
    }
}
