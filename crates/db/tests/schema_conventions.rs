use sqlx::PgPool;
use studylog_core::roles::VALID_ROLES;

/// Every `id` column is bigint.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// Unique constraints follow the `uq_` prefix so the API can map violations.
#[sqlx::test(migrations = "./migrations")]
async fn test_unique_constraints_are_prefixed(pool: PgPool) {
    let names: Vec<(String,)> = sqlx::query_as(
        "SELECT indexname
         FROM pg_indexes
         WHERE schemaname = 'public'
           AND indexdef LIKE 'CREATE UNIQUE INDEX%'
           AND indexname NOT LIKE '%_pkey'
           AND tablename != '_sqlx_migrations'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (name,) in &names {
        assert!(name.starts_with("uq_"), "Unique index {name} should start with uq_");
    }
}

/// The role check constraint accepts exactly the known roles.
#[sqlx::test(migrations = "./migrations")]
async fn test_role_constraint_matches_known_roles(pool: PgPool) {
    for (i, role) in VALID_ROLES.iter().enumerate() {
        sqlx::query("INSERT INTO members (username, nickname, role, github_id) VALUES ($1, $1, $2, $3)")
            .bind(format!("member{i}"))
            .bind(*role)
            .bind(i as i64)
            .execute(&pool)
            .await
            .unwrap_or_else(|e| panic!("role {role} should be accepted: {e}"));
    }

    let result = sqlx::query(
        "INSERT INTO members (username, nickname, role, github_id) VALUES ('x', 'x', 'owner', 99)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "unknown role should be rejected");
}
