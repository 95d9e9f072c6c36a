//! Repository for the `tags` table.

use sqlx::PgExecutor;
use studylog_core::types::DbId;

use crate::models::tag::{StudylogTag, Tag};

/// Column list for `tags` queries.
const COLUMNS: &str = "id, name, created_at";

pub struct TagRepo;

impl TagRepo {
    /// Create a tag or return the existing one with the same name.
    pub async fn create_or_get(
        executor: impl PgExecutor<'_>,
        name: &str,
    ) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Tags attached to at least one studylog, by name.
    pub async fn find_tags_included_in_post(
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.created_at FROM tags t \
             WHERE EXISTS (SELECT 1 FROM post_tags pt WHERE pt.tag_id = t.id) \
             ORDER BY t.name",
        )
        .fetch_all(executor)
        .await
    }

    /// Tags of several studylogs in one round trip.
    pub async fn find_by_studylog_ids(
        executor: impl PgExecutor<'_>,
        studylog_ids: &[DbId],
    ) -> Result<Vec<StudylogTag>, sqlx::Error> {
        sqlx::query_as::<_, StudylogTag>(
            "SELECT pt.studylog_id, t.id, t.name \
             FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.studylog_id = ANY($1) \
             ORDER BY pt.id",
        )
        .bind(studylog_ids)
        .fetch_all(executor)
        .await
    }
}
