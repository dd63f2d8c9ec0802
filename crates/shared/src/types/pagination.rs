//! Pagination for the ledger-history endpoint.

use serde::{Deserialize, Serialize};

/// Hard ceiling on page size; larger requests are clamped, not rejected.
pub const MAX_PER_PAGE: u32 = 100;

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    30
}

/// Query parameters for a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-indexed page number.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Requested page size, clamped to [`MAX_PER_PAGE`].
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Row offset for the database query.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * self.limit()
    }

    /// Row limit for the database query, after clamping the page size.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page.clamp(1, MAX_PER_PAGE))
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// Items in this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata returned alongside every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// 1-indexed page number.
    pub page: u32,
    /// Effective page size.
    pub per_page: u32,
    /// Total items across all pages.
    pub total: u64,
    /// Total page count; at least 1 even when there are no items.
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Wraps a page of items with its metadata.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}
