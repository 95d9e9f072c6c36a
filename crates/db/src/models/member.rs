//! Member entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studylog_core::types::{DbId, Timestamp};

/// A row from the `members` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub username: String,
    pub nickname: String,
    pub role: String,
    pub github_id: i64,
    pub image_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public member representation embedded in other responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberResponse {
    pub id: DbId,
    pub username: String,
    pub nickname: String,
    pub role: String,
    pub image_url: String,
}

impl From<&Member> for MemberResponse {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            username: member.username.clone(),
            nickname: member.nickname.clone(),
            role: member.role.clone(),
            image_url: member.image_url.clone(),
        }
    }
}

/// DTO for provisioning a member. Login happens elsewhere; this is the row it
/// produces.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMember {
    pub username: String,
    pub nickname: String,
    /// Defaults to `crew`.
    pub role: Option<String>,
    pub github_id: i64,
    pub image_url: Option<String>,
}
