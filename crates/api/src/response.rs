//! Shared response envelope types for API handlers.
//!
//! Single resources use the `{ "data": ... }` envelope. Paged listings
//! serialize [`studylog_core::pagination::Paged`] directly, which already
//! carries `data` next to its paging fields.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: studylog }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
