//! Shared query parameter types for API handlers.

use serde::Deserialize;
use studylog_core::pagination::{PageRequest, DEFAULT_PAGE_SIZE};

/// Page-number pagination parameters (`?page=&size=`).
///
/// Values are clamped rather than rejected; see [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn to_page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size, DEFAULT_PAGE_SIZE)
    }
}
