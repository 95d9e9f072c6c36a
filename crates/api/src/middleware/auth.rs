//! JWT-based authentication extractors for axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use studylog_core::error::CoreError;
use studylog_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated member extracted from the `Authorization: Bearer` header.
///
/// ```ignore
/// async fn my_handler(auth: AuthMember) -> AppResult<Json<()>> {
///     tracing::info!(member_id = auth.member_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthMember {
    /// The member's database id (from `claims.sub`).
    pub member_id: DbId,
    pub role: String,
}

impl FromRequestParts<AppState> for AuthMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        authenticate(auth_header, state)
    }
}

/// Member context for endpoints that also serve anonymous readers.
///
/// A missing header yields `None`; a malformed or expired token is still
/// rejected with 401.
#[derive(Debug, Clone)]
pub struct OptionalAuthMember(pub Option<AuthMember>);

impl OptionalAuthMember {
    pub fn member_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|auth| auth.member_id)
    }
}

impl FromRequestParts<AppState> for OptionalAuthMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get("authorization") else {
            return Ok(OptionalAuthMember(None));
        };
        let header = header
            .to_str()
            .map_err(|_| unauthorized("Invalid Authorization header"))?;

        authenticate(header, state).map(|auth| OptionalAuthMember(Some(auth)))
    }
}

fn authenticate(auth_header: &str, state: &AppState) -> Result<AuthMember, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    Ok(AuthMember {
        member_id: claims.sub,
        role: claims.role,
    })
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}
