//! Report routes, mounted at `/reports`. Listing by member lives under
//! `/members/{username}/reports`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// ```text
/// POST   /        -> create_report
/// GET    /{id}    -> get_report
/// PUT    /{id}    -> update_report
/// DELETE /{id}    -> delete_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(reports::create_report)).route(
        "/{id}",
        get(reports::get_report)
            .put(reports::update_report)
            .delete(reports::delete_report),
    )
}
