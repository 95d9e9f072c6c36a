//! Member lookups.

use std::collections::HashMap;

use sqlx::PgPool;
use studylog_core::error::CoreError;
use studylog_core::types::DbId;
use studylog_db::models::member::{Member, MemberResponse};
use studylog_db::repositories::MemberRepo;

use crate::error::AppResult;

pub struct MemberService<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a member by username, `NotFound` otherwise.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Member> {
        MemberRepo::find_by_username(self.pool, username)
            .await?
            .ok_or_else(|| member_not_found(username).into())
    }

    pub async fn find_by_id(&self, id: DbId) -> AppResult<Member> {
        MemberRepo::find_by_id(self.pool, id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Member",
                    id,
                }
                .into()
            })
    }

    /// Public profile of `username`.
    pub async fn find_member_response_by_username(
        &self,
        username: &str,
    ) -> AppResult<MemberResponse> {
        let member = self.find_by_username(username).await?;
        Ok(MemberResponse::from(&member))
    }

    /// Member responses keyed by id, for assembling listings.
    pub async fn responses_by_id(
        &self,
        ids: &[DbId],
    ) -> AppResult<HashMap<DbId, MemberResponse>> {
        let members = MemberRepo::find_by_ids(self.pool, ids).await?;
        Ok(members
            .iter()
            .map(|member| (member.id, MemberResponse::from(member)))
            .collect())
    }
}

pub(crate) fn member_not_found(username: &str) -> CoreError {
    CoreError::NotFoundByName {
        entity: "Member",
        name: username.to_string(),
    }
}
