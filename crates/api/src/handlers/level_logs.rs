//! Handlers for level logs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use studylog_core::types::DbId;
use studylog_db::models::level_log::LevelLogRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthMember;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::services::LevelLogService;
use crate::state::AppState;

/// GET /api/v1/levellogs
pub async fn list_level_logs(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = LevelLogService::new(&state.pool)
        .find_all(params.to_page_request())
        .await?;

    Ok(Json(page))
}

/// GET /api/v1/levellogs/{id}
pub async fn get_level_log(
    State(state): State<AppState>,
    Path(level_log_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let level_log = LevelLogService::new(&state.pool)
        .find_by_id(level_log_id)
        .await?;

    Ok(Json(DataResponse { data: level_log }))
}

/// POST /api/v1/levellogs
pub async fn create_level_log(
    auth: AuthMember,
    State(state): State<AppState>,
    Json(input): Json<LevelLogRequest>,
) -> AppResult<impl IntoResponse> {
    let level_log = LevelLogService::new(&state.pool)
        .create(auth.member_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: level_log })))
}

/// PUT /api/v1/levellogs/{id}
pub async fn update_level_log(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(level_log_id): Path<DbId>,
    Json(input): Json<LevelLogRequest>,
) -> AppResult<impl IntoResponse> {
    let level_log = LevelLogService::new(&state.pool)
        .update(auth.member_id, level_log_id, &input)
        .await?;

    Ok(Json(DataResponse { data: level_log }))
}

/// DELETE /api/v1/levellogs/{id}
pub async fn delete_level_log(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(level_log_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    LevelLogService::new(&state.pool)
        .delete(auth.member_id, level_log_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
