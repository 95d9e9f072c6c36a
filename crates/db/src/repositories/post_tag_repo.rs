//! Repository for the `post_tags` junction table.

use sqlx::PgExecutor;
use studylog_core::types::DbId;

use crate::models::tag::PostTag;

pub struct PostTagRepo;

impl PostTagRepo {
    /// Attach a tag to a studylog. Idempotent.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        studylog_id: DbId,
        tag_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO post_tags (studylog_id, tag_id) VALUES ($1, $2) \
             ON CONFLICT (studylog_id, tag_id) DO NOTHING",
        )
        .bind(studylog_id)
        .bind(tag_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Junction rows for any of the given tags.
    pub async fn find_by_tag_ids(
        executor: impl PgExecutor<'_>,
        tag_ids: &[DbId],
    ) -> Result<Vec<PostTag>, sqlx::Error> {
        sqlx::query_as::<_, PostTag>(
            "SELECT id, studylog_id, tag_id FROM post_tags WHERE tag_id = ANY($1) ORDER BY id",
        )
        .bind(tag_ids)
        .fetch_all(executor)
        .await
    }

    /// Detach every tag from a studylog. Returns the number of rows removed.
    pub async fn delete_by_studylog(
        executor: impl PgExecutor<'_>,
        studylog_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM post_tags WHERE studylog_id = $1")
            .bind(studylog_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
