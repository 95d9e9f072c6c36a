//! Repository for `reports` and its child tables: `report_graph_abilities`,
//! `reported_studylogs`, and `reported_studylog_abilities`.

use sqlx::{PgConnection, PgExecutor};
use studylog_core::report::ReportDraft;
use studylog_core::types::DbId;

use crate::models::report::{
    GraphAbilityRow, Report, ReportedStudylogAbilityRow, ReportedStudylogRow,
};

const COLUMNS: &str = "r.id, r.member_id, r.title, r.description, r.is_represent, \
    r.created_at, r.updated_at";

pub struct ReportRepo;

impl ReportRepo {
    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a report together with its graph and reported studylogs.
    pub async fn insert(conn: &mut PgConnection, draft: &ReportDraft) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports AS r (member_id, title, description, is_represent) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let report = sqlx::query_as::<_, Report>(&query)
            .bind(draft.member_id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.is_represent)
            .fetch_one(&mut *conn)
            .await?;

        Self::insert_children(conn, report.id, draft).await?;
        Ok(report)
    }

    /// Overwrite a report's fields and replace its graph and studylogs.
    ///
    /// Returns `None` if the report no longer exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        draft: &ReportDraft,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "UPDATE reports AS r \
             SET title = $2, description = $3, is_represent = $4, updated_at = now() \
             WHERE r.id = $1 \
             RETURNING {COLUMNS}"
        );
        let Some(report) = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.is_represent)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM report_graph_abilities WHERE report_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("DELETE FROM reported_studylogs WHERE report_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Self::insert_children(conn, id, draft).await?;
        Ok(Some(report))
    }

    async fn insert_children(
        conn: &mut PgConnection,
        report_id: DbId,
        draft: &ReportDraft,
    ) -> Result<(), sqlx::Error> {
        for (sort_order, entry) in draft.graph.iter().enumerate() {
            sqlx::query(
                "INSERT INTO report_graph_abilities \
                 (report_id, ability_id, weight, is_present, sort_order) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(report_id)
            .bind(entry.ability_id)
            .bind(entry.weight)
            .bind(entry.is_present)
            .bind(sort_order as i32)
            .execute(&mut *conn)
            .await?;
        }

        for studylog in draft.merged_studylogs() {
            let reported_id: DbId = sqlx::query_scalar(
                "INSERT INTO reported_studylogs (report_id, studylog_id) \
                 VALUES ($1, $2) RETURNING id",
            )
            .bind(report_id)
            .bind(studylog.studylog_id)
            .fetch_one(&mut *conn)
            .await?;

            if studylog.ability_ids.is_empty() {
                continue;
            }
            sqlx::query(
                "INSERT INTO reported_studylog_abilities (reported_studylog_id, ability_id) \
                 SELECT $1, UNNEST($2::bigint[]) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(reported_id)
            .bind(&studylog.ability_ids)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Clear the represent flag on every report of the member except
    /// `except`. Returns the number of demoted reports.
    pub async fn demote_represent(
        executor: impl PgExecutor<'_>,
        member_id: DbId,
        except: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reports SET is_represent = false, updated_at = now() \
             WHERE member_id = $1 AND is_represent \
               AND ($2::bigint IS NULL OR id <> $2)",
        )
        .bind(member_id)
        .bind(except)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a report. Child rows cascade.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports r WHERE r.id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The member's report titled `title`, if any.
    pub async fn find_by_title_and_member(
        executor: impl PgExecutor<'_>,
        title: &str,
        member_id: DbId,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports r WHERE r.title = $1 AND r.member_id = $2");
        sqlx::query_as::<_, Report>(&query)
            .bind(title)
            .bind(member_id)
            .fetch_optional(executor)
            .await
    }

    /// The represented report of the member, if one is flagged.
    pub async fn find_represent_of(
        executor: impl PgExecutor<'_>,
        member_id: DbId,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports r WHERE r.member_id = $1 AND r.is_represent"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(member_id)
            .fetch_optional(executor)
            .await
    }

    /// The member's reports, newest first.
    pub async fn list_by_member(
        executor: impl PgExecutor<'_>,
        member_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports r WHERE r.member_id = $1 \
             ORDER BY r.id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(member_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    pub async fn count_by_member(
        executor: impl PgExecutor<'_>,
        member_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reports WHERE member_id = $1")
            .bind(member_id)
            .fetch_one(executor)
            .await
    }

    // -----------------------------------------------------------------------
    // Detail loads
    // -----------------------------------------------------------------------

    /// Graph entries of a report in declaration order.
    pub async fn graph_abilities(
        executor: impl PgExecutor<'_>,
        report_id: DbId,
    ) -> Result<Vec<GraphAbilityRow>, sqlx::Error> {
        sqlx::query_as::<_, GraphAbilityRow>(
            "SELECT g.ability_id, a.name, a.description, a.color, g.weight, g.is_present \
             FROM report_graph_abilities g \
             JOIN abilities a ON a.id = g.ability_id \
             WHERE g.report_id = $1 \
             ORDER BY g.sort_order, g.id",
        )
        .bind(report_id)
        .fetch_all(executor)
        .await
    }

    pub async fn reported_studylogs(
        executor: impl PgExecutor<'_>,
        report_id: DbId,
    ) -> Result<Vec<ReportedStudylogRow>, sqlx::Error> {
        sqlx::query_as::<_, ReportedStudylogRow>(
            "SELECT rs.id, rs.studylog_id, s.title, s.content \
             FROM reported_studylogs rs \
             JOIN studylogs s ON s.id = rs.studylog_id \
             WHERE rs.report_id = $1 \
             ORDER BY rs.id",
        )
        .bind(report_id)
        .fetch_all(executor)
        .await
    }

    /// Abilities cited by every reported studylog of the report.
    pub async fn reported_studylog_abilities(
        executor: impl PgExecutor<'_>,
        report_id: DbId,
    ) -> Result<Vec<ReportedStudylogAbilityRow>, sqlx::Error> {
        sqlx::query_as::<_, ReportedStudylogAbilityRow>(
            "SELECT rsa.reported_studylog_id, rsa.ability_id, a.name, a.color \
             FROM reported_studylog_abilities rsa \
             JOIN reported_studylogs rs ON rs.id = rsa.reported_studylog_id \
             JOIN abilities a ON a.id = rsa.ability_id \
             WHERE rs.report_id = $1 \
             ORDER BY rsa.reported_studylog_id, rsa.ability_id",
        )
        .bind(report_id)
        .fetch_all(executor)
        .await
    }
}
