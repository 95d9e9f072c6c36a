//! Repository for the `popular_studylogs` snapshot table.

use sqlx::{PgConnection, PgExecutor};
use studylog_core::popularity::RankedStudylog;
use studylog_core::types::DbId;

use crate::models::studylog::{PopularStudylog, Studylog};

const COLUMNS: &str = "id, studylog_id, rank, score, created_at";

pub struct PopularStudylogRepo;

impl PopularStudylogRepo {
    /// Replace the whole snapshot with `ranked`.
    ///
    /// Callers run this inside a transaction so readers never observe an
    /// empty snapshot.
    pub async fn replace_snapshot(
        conn: &mut PgConnection,
        ranked: &[RankedStudylog],
    ) -> Result<u64, sqlx::Error> {
        sqlx::query("DELETE FROM popular_studylogs")
            .execute(&mut *conn)
            .await?;

        if ranked.is_empty() {
            return Ok(0);
        }

        let studylog_ids: Vec<DbId> = ranked.iter().map(|r| r.studylog_id).collect();
        let ranks: Vec<i32> = ranked.iter().map(|r| r.rank).collect();
        let scores: Vec<i64> = ranked.iter().map(|r| r.score).collect();

        let result = sqlx::query(
            "INSERT INTO popular_studylogs (studylog_id, rank, score) \
             SELECT * FROM UNNEST($1::bigint[], $2::int[], $3::bigint[])",
        )
        .bind(&studylog_ids)
        .bind(&ranks)
        .bind(&scores)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Snapshot entries in rank order.
    pub async fn list_entries(
        executor: impl PgExecutor<'_>,
    ) -> Result<Vec<PopularStudylog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM popular_studylogs ORDER BY rank ASC");
        sqlx::query_as::<_, PopularStudylog>(&query)
            .fetch_all(executor)
            .await
    }

    /// Studylogs of the snapshot in rank order, paginated.
    pub async fn list_studylogs(
        executor: impl PgExecutor<'_>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Studylog>, sqlx::Error> {
        sqlx::query_as::<_, Studylog>(
            "SELECT s.id, s.member_id, s.title, s.content, s.view_count, s.like_count, \
                    s.created_at, s.updated_at \
             FROM popular_studylogs p \
             JOIN studylogs s ON s.id = p.studylog_id \
             ORDER BY p.rank ASC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }

    pub async fn count(executor: impl PgExecutor<'_>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM popular_studylogs")
            .fetch_one(executor)
            .await
    }
}
