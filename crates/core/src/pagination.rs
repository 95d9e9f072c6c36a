//! Page-number pagination.
//!
//! Clients send a 1-based `page` and a `size`; repositories want `LIMIT` and
//! `OFFSET`. Out-of-range values are clamped rather than rejected.

use serde::Serialize;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size for list endpoints.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    /// Clamp user-provided values: `page >= 1`, `1 <= size <= MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, size: Option<i64>, default_size: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            size: clamp_limit(size, default_size, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_PAGE_SIZE)
    }
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Number of pages needed to show `total` items `size` at a time.
pub fn total_pages(total: i64, size: i64) -> i64 {
    if total <= 0 || size <= 0 {
        return 0;
    }
    (total + size - 1) / size
}

/// Paged response body: `{ data, total_size, total_page, current_page }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paged<T: Serialize> {
    pub data: Vec<T>,
    pub total_size: i64,
    pub total_page: i64,
    pub current_page: i64,
}

impl<T: Serialize> Paged<T> {
    pub fn new(data: Vec<T>, total_size: i64, page: PageRequest) -> Self {
        Self {
            data,
            total_size,
            total_page: total_pages(total_size, page.size),
            current_page: page.page,
        }
    }

    pub fn map<U: Serialize>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            data: self.data.into_iter().map(f).collect(),
            total_size: self.total_size,
            total_page: self.total_page,
            current_page: self.current_page,
        }
    }
}
