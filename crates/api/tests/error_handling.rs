//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly and need no server or database.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use studylog_api::error::AppError;
use studylog_core::error::CoreError;
use studylog_core::report::ReportError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Studylog",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Studylog with id 42 not found");
}

#[tokio::test]
async fn not_found_by_name_returns_404() {
    let err = AppError::Core(CoreError::NotFoundByName {
        entity: "Member",
        name: "ghost".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Member 'ghost' not found");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("bad page".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "bad page");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("title is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unauthorized_and_forbidden_map_to_401_and_403() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("no token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("not yours".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn report_errors_carry_their_own_codes() {
    let cases = [
        (
            ReportError::GraphAbilitiesAreNotParent,
            StatusCode::BAD_REQUEST,
            "GRAPH_ABILITIES_NOT_PARENT",
        ),
        (
            ReportError::UnrelatedAbilityExistence,
            StatusCode::BAD_REQUEST,
            "UNRELATED_ABILITY_EXISTS",
        ),
        (
            ReportError::DuplicateReportTitle,
            StatusCode::BAD_REQUEST,
            "DUPLICATE_REPORT_TITLE",
        ),
        (
            ReportError::UnsupportedReportsType("weekly".into()),
            StatusCode::BAD_REQUEST,
            "UNSUPPORTED_REPORTS_TYPE",
        ),
        (
            ReportError::MemberNotAllowed,
            StatusCode::FORBIDDEN,
            "MEMBER_NOT_ALLOWED",
        ),
    ];

    for (err, expected_status, expected_code) in cases {
        let (status, json) = error_to_response(err.into()).await;
        assert_eq!(status, expected_status, "{expected_code}");
        assert_eq!(json["code"], expected_code);
    }
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("secret connection string".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
