//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is properly configured
//! and that schema synchronization works against a live server. They read
//! the usual `POSTGRES_*` variables and are ignored by default.

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    schema::{ColumnDef, ColumnType, TableSchema, UniqueConstraint, synchronize},
};
use sqlx::Row;

const PROBE_TABLE: TableSchema = TableSchema {
    name: "infrastructure_probe",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::required("label", ColumnType::Varchar),
    ],
    unique: &[UniqueConstraint {
        name: "UQ_infrastructure_probe_label",
        column: "label",
    }],
};

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    // Running it twice must be a no-op the second time
    synchronize(&pool, &PROBE_TABLE).await?;
    synchronize(&pool, &PROBE_TABLE).await?;

    sqlx::query("INSERT INTO infrastructure_probe (label) VALUES ($1)")
        .bind("probe")
        .execute(&pool)
        .await?;

    let duplicate = sqlx::query("INSERT INTO infrastructure_probe (label) VALUES ($1)")
        .bind("probe")
        .execute(&pool)
        .await;

    let constraint = duplicate
        .err()
        .and_then(|e| e.as_database_error().and_then(|d| d.constraint().map(str::to_owned)));
    assert_eq!(
        constraint.as_deref().and_then(|c| PROBE_TABLE.unique_column(c)),
        Some("label"),
        "Unique violation was not reported against the label constraint"
    );

    sqlx::query("DROP TABLE infrastructure_probe")
        .execute(&pool)
        .await?;

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL server"]
async fn test_synchronize_adds_missing_unique_constraints() -> Result<(), Box<dyn std::error::Error>> {
    const LEGACY_TABLE: TableSchema = TableSchema {
        name: "infrastructure_legacy",
        columns: &[
            ColumnDef::primary_key("id"),
            ColumnDef::required("label", ColumnType::Varchar),
            ColumnDef::required("code", ColumnType::Varchar),
        ],
        unique: &[
            UniqueConstraint {
                name: "UQ_infrastructure_legacy_label",
                column: "label",
            },
            UniqueConstraint {
                name: "UQ_infrastructure_legacy_code",
                column: "code",
            },
        ],
    };

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    sqlx::query("DROP TABLE IF EXISTS infrastructure_legacy")
        .execute(&pool)
        .await?;

    // label is already unique under a generated name, code is not unique at all
    sqlx::query(
        "CREATE TABLE infrastructure_legacy (id SERIAL PRIMARY KEY, \
         label VARCHAR NOT NULL UNIQUE, code VARCHAR NOT NULL)",
    )
    .execute(&pool)
    .await?;

    synchronize(&pool, &LEGACY_TABLE).await?;
    synchronize(&pool, &LEGACY_TABLE).await?;

    let mut names: Vec<String> = sqlx::query_scalar(
        "SELECT conname::text FROM pg_constraint \
         WHERE conrelid = 'infrastructure_legacy'::regclass AND contype = 'u'",
    )
    .fetch_all(&pool)
    .await?;
    names.sort();
    assert_eq!(
        names,
        vec![
            "UQ_infrastructure_legacy_code".to_string(),
            "infrastructure_legacy_label_key".to_string(),
        ]
    );

    sqlx::query("INSERT INTO infrastructure_legacy (label, code) VALUES ('a', 'x')")
        .execute(&pool)
        .await?;
    let duplicate = sqlx::query("INSERT INTO infrastructure_legacy (label, code) VALUES ('b', 'x')")
        .execute(&pool)
        .await;
    assert!(
        duplicate
            .err()
            .and_then(|e| e.as_database_error().map(|d| d.is_unique_violation()))
            .unwrap_or(false),
        "Added constraint did not reject a duplicate code"
    );

    sqlx::query("DROP TABLE infrastructure_legacy")
        .execute(&pool)
        .await?;

    Ok(())
}
