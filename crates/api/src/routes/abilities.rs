use axum::routing::get;
use axum::Router;

use crate::handlers::abilities;
use crate::state::AppState;

/// ```text
/// GET  /    -> list_abilities
/// POST /    -> create_ability (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(abilities::list_abilities).post(abilities::create_ability),
    )
}
