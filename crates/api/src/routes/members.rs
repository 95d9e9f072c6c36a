//! Member-scoped read routes, mounted at `/members`.

use axum::routing::get;
use axum::Router;

use crate::handlers::members;
use crate::state::AppState;

/// ```text
/// GET /{username}/profile    -> get_profile
/// GET /{username}/posts      -> list_posts
/// GET /{username}/reports    -> list_reports
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{username}/profile", get(members::get_profile))
        .route("/{username}/posts", get(members::list_posts))
        .route("/{username}/reports", get(members::list_reports))
}
