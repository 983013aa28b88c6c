//! Offset pagination shared by every listing.

use serde::{Deserialize, Serialize};

use crate::api::HandlerError;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// A validated page request. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Missing values fall back to page 1 / limit 10; `limit` is capped at
    /// [`MAX_LIMIT`]. Values below 1 are rejected.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, HandlerError> {
        let page = page.unwrap_or(DEFAULT_PAGE as i64);
        let limit = limit.unwrap_or(DEFAULT_LIMIT as i64);
        if page < 1 {
            return Err(HandlerError::Validation("page must be at least 1".into()));
        }
        if limit < 1 {
            return Err(HandlerError::Validation("limit must be at least 1".into()));
        }
        Ok(Self {
            page: usize::try_from(page).unwrap_or(usize::MAX),
            limit: usize::try_from(limit).unwrap_or(MAX_LIMIT).min(MAX_LIMIT),
        })
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: usize,
}

impl Pagination {
    pub fn new(request: PageRequest, total_items: usize) -> Self {
        Self {
            current_page: request.page,
            total_pages: total_items.div_ceil(request.limit),
            total_items,
            items_per_page: request.limit,
        }
    }
}

/// One page of an already filtered and ordered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let pagination = Pagination::new(request, items.len());
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.limit)
        .collect();
    Page { items, pagination }
}
