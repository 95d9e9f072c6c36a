//! Handlers for tags.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::services::PostTagService;
use crate::state::AppState;

/// GET /api/v1/tags
///
/// Tags attached to at least one studylog.
pub async fn list_tags(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = PostTagService::new(&state.pool)
        .find_tags_included_in_post()
        .await?;

    Ok(Json(DataResponse { data: tags }))
}
