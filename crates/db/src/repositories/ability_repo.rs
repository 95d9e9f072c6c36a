//! Repository for the `abilities` table.

use sqlx::PgExecutor;
use studylog_core::ability::AbilityTree;
use studylog_core::types::DbId;

use crate::models::ability::Ability;

const COLUMNS: &str = "id, name, description, color, parent_id, created_at";

pub struct AbilityRepo;

impl AbilityRepo {
    pub async fn create(
        executor: impl PgExecutor<'_>,
        name: &str,
        description: &str,
        color: &str,
        parent_id: Option<DbId>,
    ) -> Result<Ability, sqlx::Error> {
        let query = format!(
            "INSERT INTO abilities (name, description, color, parent_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ability>(&query)
            .bind(name)
            .bind(description)
            .bind(color)
            .bind(parent_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Ability>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM abilities WHERE id = $1");
        sqlx::query_as::<_, Ability>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Every ability, parents before children, each group by id.
    pub async fn list_all(executor: impl PgExecutor<'_>) -> Result<Vec<Ability>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM abilities \
             ORDER BY (parent_id IS NOT NULL), id"
        );
        sqlx::query_as::<_, Ability>(&query)
            .fetch_all(executor)
            .await
    }

    /// Load the abilities named in `ids` plus their direct children.
    ///
    /// That is enough for every parent/child question the report checks
    /// ask about `ids`.
    pub async fn load_tree_around(
        executor: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<AbilityTree, sqlx::Error> {
        if ids.is_empty() {
            return Ok(AbilityTree::default());
        }
        let rows: Vec<(DbId, Option<DbId>)> = sqlx::query_as(
            "SELECT id, parent_id FROM abilities \
             WHERE id = ANY($1) OR parent_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(AbilityTree::from_records(rows))
    }
}
