use axum::routing::get;
use axum::Router;

use crate::handlers::level_logs;
use crate::state::AppState;

/// ```text
/// GET    /        -> list_level_logs
/// POST   /        -> create_level_log
/// GET    /{id}    -> get_level_log
/// PUT    /{id}    -> update_level_log
/// DELETE /{id}    -> delete_level_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(level_logs::list_level_logs).post(level_logs::create_level_log),
        )
        .route(
            "/{id}",
            get(level_logs::get_level_log)
                .put(level_logs::update_level_log)
                .delete(level_logs::delete_level_log),
        )
}
