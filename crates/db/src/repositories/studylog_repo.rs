//! Repository for the `studylogs` and `studylog_likes` tables.

use sqlx::{PgConnection, PgExecutor};
use studylog_core::popularity::PopularityInput;
use studylog_core::types::DbId;

use crate::models::studylog::{Studylog, StudylogFilter};

/// Column list for `studylogs` queries, aliased as `s`.
const COLUMNS: &str = "s.id, s.member_id, s.title, s.content, s.view_count, s.like_count, \
    s.created_at, s.updated_at";

/// Shared `WHERE` clause for search and count.
///
/// `$1` keyword pattern (nullable), `$2` tag ids, `$3` usernames. Empty
/// arrays disable their filter.
const SEARCH_FILTER: &str = "\
    ($1::text IS NULL OR s.title ILIKE $1 OR s.content ILIKE $1) \
    AND (cardinality($2::bigint[]) = 0 OR EXISTS ( \
        SELECT 1 FROM post_tags pt WHERE pt.studylog_id = s.id AND pt.tag_id = ANY($2))) \
    AND (cardinality($3::text[]) = 0 OR s.member_id IN ( \
        SELECT m.id FROM members m WHERE m.username = ANY($3)))";

pub struct StudylogRepo;

impl StudylogRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        member_id: DbId,
        title: &str,
        content: &str,
    ) -> Result<Studylog, sqlx::Error> {
        let query = format!(
            "INSERT INTO studylogs AS s (member_id, title, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Studylog>(&query)
            .bind(member_id)
            .bind(title)
            .bind(content)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Studylog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM studylogs s WHERE s.id = $1");
        sqlx::query_as::<_, Studylog>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Fetch several studylogs, preserving no particular order.
    pub async fn find_by_ids(
        executor: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<Vec<Studylog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM studylogs s WHERE s.id = ANY($1)");
        sqlx::query_as::<_, Studylog>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// Search studylogs, newest first.
    pub async fn search(
        executor: impl PgExecutor<'_>,
        filter: &StudylogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Studylog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM studylogs s \
             WHERE {SEARCH_FILTER} \
             ORDER BY s.id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Studylog>(&query)
            .bind(keyword_pattern(filter))
            .bind(&filter.tag_ids)
            .bind(&filter.usernames)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    /// Count the studylogs matched by [`StudylogRepo::search`].
    pub async fn count(
        executor: impl PgExecutor<'_>,
        filter: &StudylogFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM studylogs s WHERE {SEARCH_FILTER}");
        sqlx::query_scalar(&query)
            .bind(keyword_pattern(filter))
            .bind(&filter.tag_ids)
            .bind(&filter.usernames)
            .fetch_one(executor)
            .await
    }

    /// Update title and content. Returns `None` if the studylog is gone.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        title: &str,
        content: &str,
    ) -> Result<Option<Studylog>, sqlx::Error> {
        let query = format!(
            "UPDATE studylogs AS s SET title = $2, content = $3, updated_at = now() \
             WHERE s.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Studylog>(&query)
            .bind(id)
            .bind(title)
            .bind(content)
            .fetch_optional(executor)
            .await
    }

    /// Delete a studylog. Tags, likes and report citations cascade.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM studylogs WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increase_view_count(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE studylogs SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Likes
    // -----------------------------------------------------------------------

    /// Record a like. Idempotent: `like_count` only moves on a new row.
    ///
    /// Returns `true` when a like was added.
    pub async fn like(
        conn: &mut PgConnection,
        studylog_id: DbId,
        member_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO studylog_likes (studylog_id, member_id) VALUES ($1, $2) \
             ON CONFLICT (studylog_id, member_id) DO NOTHING",
        )
        .bind(studylog_id)
        .bind(member_id)
        .execute(&mut *conn)
        .await?;

        let was_inserted = result.rows_affected() > 0;
        if was_inserted {
            sqlx::query("UPDATE studylogs SET like_count = like_count + 1 WHERE id = $1")
                .bind(studylog_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(was_inserted)
    }

    /// Remove a like. Returns `true` when a like existed.
    pub async fn unlike(
        conn: &mut PgConnection,
        studylog_id: DbId,
        member_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM studylog_likes WHERE studylog_id = $1 AND member_id = $2")
                .bind(studylog_id)
                .bind(member_id)
                .execute(&mut *conn)
                .await?;

        let was_deleted = result.rows_affected() > 0;
        if was_deleted {
            sqlx::query(
                "UPDATE studylogs SET like_count = GREATEST(like_count - 1, 0) WHERE id = $1",
            )
            .bind(studylog_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(was_deleted)
    }

    /// Which of `studylog_ids` the member has liked.
    pub async fn liked_ids(
        executor: impl PgExecutor<'_>,
        member_id: DbId,
        studylog_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT studylog_id FROM studylog_likes \
             WHERE member_id = $1 AND studylog_id = ANY($2)",
        )
        .bind(member_id)
        .bind(studylog_ids)
        .fetch_all(executor)
        .await
    }

    /// The `limit` best-scoring studylogs, where a like weighs `like_weight`
    /// views. Ties go to the newer studylog.
    pub async fn top_by_popularity(
        executor: impl PgExecutor<'_>,
        like_weight: i64,
        limit: i64,
    ) -> Result<Vec<PopularityInput>, sqlx::Error> {
        let rows: Vec<(DbId, i64, i64)> = sqlx::query_as(
            "SELECT id, view_count, like_count FROM studylogs \
             ORDER BY view_count + like_count * $1 DESC, id DESC \
             LIMIT $2",
        )
        .bind(like_weight)
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(studylog_id, view_count, like_count)| PopularityInput {
                studylog_id,
                view_count,
                like_count,
            })
            .collect())
    }
}

fn keyword_pattern(filter: &StudylogFilter) -> Option<String> {
    filter.keyword.as_ref().map(|k| {
        let escaped = k.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        format!("%{escaped}%")
    })
}
