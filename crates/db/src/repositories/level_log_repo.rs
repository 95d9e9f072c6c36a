//! Repository for `level_logs` and `self_discussions`.

use sqlx::{PgConnection, PgExecutor};
use studylog_core::types::DbId;

use crate::models::level_log::{LevelLog, SelfDiscussion};

const COLUMNS: &str = "id, member_id, title, content, created_at, updated_at";

const DISCUSSION_COLUMNS: &str = "id, level_log_id, question, answer, sort_order";

pub struct LevelLogRepo;

impl LevelLogRepo {
    /// Insert a level log and its discussions in order.
    pub async fn create(
        conn: &mut PgConnection,
        member_id: DbId,
        title: &str,
        content: &str,
        discussions: &[(&str, &str)],
    ) -> Result<LevelLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO level_logs (member_id, title, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let level_log = sqlx::query_as::<_, LevelLog>(&query)
            .bind(member_id)
            .bind(title)
            .bind(content)
            .fetch_one(&mut *conn)
            .await?;

        Self::insert_discussions(conn, level_log.id, discussions).await?;
        Ok(level_log)
    }

    /// Overwrite title and content and replace the discussions wholesale.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        title: &str,
        content: &str,
        discussions: &[(&str, &str)],
    ) -> Result<Option<LevelLog>, sqlx::Error> {
        let query = format!(
            "UPDATE level_logs SET title = $2, content = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(level_log) = sqlx::query_as::<_, LevelLog>(&query)
            .bind(id)
            .bind(title)
            .bind(content)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM self_discussions WHERE level_log_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Self::insert_discussions(conn, id, discussions).await?;
        Ok(Some(level_log))
    }

    async fn insert_discussions(
        conn: &mut PgConnection,
        level_log_id: DbId,
        discussions: &[(&str, &str)],
    ) -> Result<(), sqlx::Error> {
        for (sort_order, (question, answer)) in discussions.iter().enumerate() {
            sqlx::query(
                "INSERT INTO self_discussions (level_log_id, question, answer, sort_order) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(level_log_id)
            .bind(*question)
            .bind(*answer)
            .bind(sort_order as i32)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<LevelLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM level_logs WHERE id = $1");
        sqlx::query_as::<_, LevelLog>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Level logs, newest first.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LevelLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM level_logs \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, LevelLog>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    pub async fn count(executor: impl PgExecutor<'_>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM level_logs")
            .fetch_one(executor)
            .await
    }

    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM level_logs WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_discussions(
        executor: impl PgExecutor<'_>,
        level_log_id: DbId,
    ) -> Result<Vec<SelfDiscussion>, sqlx::Error> {
        let query = format!(
            "SELECT {DISCUSSION_COLUMNS} FROM self_discussions \
             WHERE level_log_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, SelfDiscussion>(&query)
            .bind(level_log_id)
            .fetch_all(executor)
            .await
    }
}
