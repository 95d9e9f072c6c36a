//! Studylog routes, mounted at `/studylogs`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::studylogs;
use crate::state::AppState;

/// ```text
/// GET    /                -> list_studylogs
/// POST   /                -> create_studylog
/// GET    /popular         -> list_popular
/// GET    /popular/sync    -> sync_popular (admin only)
/// GET    /{id}            -> get_studylog
/// PUT    /{id}            -> update_studylog
/// DELETE /{id}            -> delete_studylog
/// POST   /{id}/likes      -> like_studylog
/// DELETE /{id}/likes      -> unlike_studylog
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(studylogs::list_studylogs).post(studylogs::create_studylog),
        )
        .route("/popular", get(studylogs::list_popular))
        .route("/popular/sync", get(studylogs::sync_popular))
        .route(
            "/{id}",
            get(studylogs::get_studylog)
                .put(studylogs::update_studylog)
                .delete(studylogs::delete_studylog),
        )
        .route(
            "/{id}/likes",
            post(studylogs::like_studylog).delete(studylogs::unlike_studylog),
        )
}
