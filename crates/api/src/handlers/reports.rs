//! Handlers for reports.
//!
//! Reads are public; writes require the owning member.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use studylog_core::types::DbId;
use studylog_db::models::report::ReportRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthMember;
use crate::response::DataResponse;
use crate::services::ReportService;
use crate::state::AppState;

/// POST /api/v1/reports
pub async fn create_report(
    auth: AuthMember,
    State(state): State<AppState>,
    Json(input): Json<ReportRequest>,
) -> AppResult<impl IntoResponse> {
    let report = ReportService::new(&state.pool)
        .create(auth.member_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// GET /api/v1/reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = ReportService::new(&state.pool).find_by_id(report_id).await?;

    Ok(Json(DataResponse { data: report }))
}

/// PUT /api/v1/reports/{id}
pub async fn update_report(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
    Json(input): Json<ReportRequest>,
) -> AppResult<impl IntoResponse> {
    let report = ReportService::new(&state.pool)
        .update(auth.member_id, report_id, &input)
        .await?;

    Ok(Json(DataResponse { data: report }))
}

/// DELETE /api/v1/reports/{id}
pub async fn delete_report(
    auth: AuthMember,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ReportService::new(&state.pool)
        .delete(auth.member_id, report_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
