//! Repository for the `members` table.

use sqlx::{PgConnection, PgExecutor};
use studylog_core::roles::ROLE_CREW;
use studylog_core::types::DbId;

use crate::models::member::{CreateMember, Member};

/// Column list for `members` queries.
const COLUMNS: &str = "id, username, nickname, role, github_id, image_url, created_at, updated_at";

pub struct MemberRepo;

impl MemberRepo {
    /// Insert a new member, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateMember,
    ) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (username, nickname, role, github_id, image_url) \
             VALUES ($1, $2, $3, $4, COALESCE($5, '')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&input.username)
            .bind(&input.nickname)
            .bind(input.role.as_deref().unwrap_or(ROLE_CREW))
            .bind(input.github_id)
            .bind(&input.image_url)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_username(
        executor: impl PgExecutor<'_>,
        username: &str,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE username = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(username)
            .fetch_optional(executor)
            .await
    }

    /// Fetch several members at once. Missing ids are skipped.
    pub async fn find_by_ids(
        executor: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = ANY($1)");
        sqlx::query_as::<_, Member>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// Take a row lock on the member for the rest of the transaction.
    ///
    /// Writers that maintain per-member invariants (the single represented
    /// report) serialize on this lock. Returns `None` if the member is gone.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }
}
