//! Handlers for member-scoped reads.
//!
//! All endpoints are public.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use studylog_db::models::report::ReportsQueryParams;

use crate::error::AppResult;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::services::{MemberService, ReportService, ReportsListing, StudylogService};
use crate::state::AppState;

/// GET /api/v1/members/{username}/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    let profile = MemberService::new(&state.pool)
        .find_member_response_by_username(&username)
        .await?;

    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/members/{username}/posts
///
/// Studylogs written by the member, newest first.
pub async fn list_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page = StudylogService::new(&state.pool)
        .find_studylogs_of(&username, params.to_page_request())
        .await?;

    Ok(Json(page))
}

/// GET /api/v1/members/{username}/reports?type=simple|represent
///
/// `simple` pages through report summaries; `represent` returns the
/// represented report in full, or `null` when none is flagged.
pub async fn list_reports(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<ReportsQueryParams>,
) -> AppResult<Response> {
    let page = PageParams {
        page: params.page,
        size: params.size,
    };
    let listing = ReportService::new(&state.pool)
        .find_by_username(&username, params.kind.as_deref(), page.to_page_request())
        .await?;

    Ok(match listing {
        ReportsListing::Simple(page) => Json(page).into_response(),
        ReportsListing::Represent(report) => Json(DataResponse { data: report }).into_response(),
    })
}
