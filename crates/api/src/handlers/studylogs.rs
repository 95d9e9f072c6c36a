//! Handlers for studylogs, likes and the popular snapshot.
//!
//! Reads accept an optional Bearer token so responses can report whether the
//! reader liked each studylog. Writes require the author.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use studylog_core::error::CoreError;
use studylog_core::types::DbId;
use studylog_db::models::studylog::{PopularSyncParams, StudylogRequest, StudylogSearchParams};

use crate::error::AppResult;
use crate::middleware::auth::{AuthMember, OptionalAuthMember};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::services::StudylogService;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/studylogs?keyword=&tags=&usernames=&page=&size=
pub async fn list_studylogs(
    viewer: OptionalAuthMember,
    State(state): State<AppState>,
    Query(params): Query<StudylogSearchParams>,
) -> AppResult<impl IntoResponse> {
    let page = StudylogService::new(&state.pool)
        .search(&params, viewer.member_id())
        .await?;

    Ok(Json(page))
}

/// GET /api/v1/studylogs/{id}
///
/// Counts a view unless the reader is the author. A non-numeric id is
/// reported as not found.
pub async fn get_studylog(
    viewer: OptionalAuthMember,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id: DbId = raw_id.parse().map_err(|_| CoreError::NotFoundByName {
        entity: "Studylog",
        name: raw_id.clone(),
    })?;

    let studylog = StudylogService::new(&state.pool)
        .find_by_id(id, viewer.member_id())
        .await?;

    Ok(Json(DataResponse { data: studylog }))
}

/// GET /api/v1/studylogs/popular
pub async fn list_popular(
    viewer: OptionalAuthMember,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = StudylogService::new(&state.pool)
        .find_popular(params.to_page_request(), viewer.member_id())
        .await?;

    Ok(Json(page))
}

/// GET /api/v1/studylogs/popular/sync?size=N
///
/// Admin only. Recomputes the ranking and replaces the snapshot.
pub async fn sync_popular(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PopularSyncParams>,
) -> AppResult<impl IntoResponse> {
    let result = StudylogService::new(&state.pool)
        .sync_popular(params.size)
        .await?;

    tracing::info!(member_id = admin.member_id, synced = result.synced, "Popular sync requested");

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /api/v1/studylogs
pub async fn create_studylog(
    auth: AuthMember,
    State(state): State<AppState>,
    Json(input): Json<StudylogRequest>,
) -> AppResult<impl IntoResponse> {
    let studylog = StudylogService::new(&state.pool)
        .create(auth.member_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: studylog })))
}

/// PUT /api/v1/studylogs/{id}
pub async fn update_studylog(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(studylog_id): Path<DbId>,
    Json(input): Json<StudylogRequest>,
) -> AppResult<impl IntoResponse> {
    let studylog = StudylogService::new(&state.pool)
        .update(auth.member_id, studylog_id, &input)
        .await?;

    Ok(Json(DataResponse { data: studylog }))
}

/// DELETE /api/v1/studylogs/{id}
pub async fn delete_studylog(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(studylog_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    StudylogService::new(&state.pool)
        .delete(auth.member_id, studylog_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/studylogs/{id}/likes
pub async fn like_studylog(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(studylog_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let studylog = StudylogService::new(&state.pool)
        .like(auth.member_id, studylog_id)
        .await?;

    Ok(Json(DataResponse { data: studylog }))
}

/// DELETE /api/v1/studylogs/{id}/likes
pub async fn unlike_studylog(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(studylog_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let studylog = StudylogService::new(&state.pool)
        .unlike(auth.member_id, studylog_id)
        .await?;

    Ok(Json(DataResponse { data: studylog }))
}
