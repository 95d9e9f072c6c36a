//! Handlers for the ability hierarchy.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use studylog_db::models::ability::CreateAbility;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::AbilityService;
use crate::state::AppState;

/// GET /api/v1/abilities
pub async fn list_abilities(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tree = AbilityService::new(&state.pool).find_tree().await?;

    Ok(Json(DataResponse { data: tree }))
}

/// POST /api/v1/abilities
///
/// Admin only. Abilities are shared by every member.
pub async fn create_ability(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAbility>,
) -> AppResult<impl IntoResponse> {
    let ability = AbilityService::new(&state.pool).create(&input).await?;

    tracing::debug!(ability_id = ability.id, member_id = admin.member_id, "Ability created by admin");

    Ok((StatusCode::CREATED, Json(DataResponse { data: ability })))
}
