pub mod abilities;
pub mod health;
pub mod level_logs;
pub mod members;
pub mod reports;
pub mod studylogs;
pub mod tags;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /members/{username}/posts                      member's studylogs
/// /members/{username}/profile                    member profile
/// /members/{username}/reports                    reports by ?type=
///
/// /studylogs                                     search, create
/// /studylogs/{id}                                get, update, delete
/// /studylogs/{id}/likes                          like, unlike
/// /studylogs/popular                             popular snapshot
/// /studylogs/popular/sync                        recompute (admin only)
///
/// /tags                                          tags in use
///
/// /abilities                                     tree, create (admin only)
///
/// /reports                                       create
/// /reports/{id}                                  get, update, delete
///
/// /levellogs                                     list, create
/// /levellogs/{id}                                get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/members", members::router())
        .nest("/studylogs", studylogs::router())
        .nest("/tags", tags::router())
        .nest("/abilities", abilities::router())
        .nest("/reports", reports::router())
        .nest("/levellogs", level_logs::router())
}
