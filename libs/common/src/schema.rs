//! Explicit table definitions and start-up schema synchronization
//!
//! Tables are described as plain data (name, columns, unique constraints)
//! instead of being derived from annotated structs. The same definition is
//! used to create the table and to map constraint violations back to the
//! column that caused them.

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::{info, warn};

/// SQL column types used by the services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-incrementing 32-bit integer
    Serial,
    /// Variable-length string
    Varchar,
}

impl ColumnType {
    fn sql(self) -> &'static str {
        match self {
            ColumnType::Serial => "SERIAL",
            ColumnType::Varchar => "VARCHAR",
        }
    }
}

/// A single column of a table
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub primary_key: bool,
    pub nullable: bool,
}

impl ColumnDef {
    /// Auto-generated integer primary key
    pub const fn primary_key(name: &'static str) -> Self {
        Self {
            name,
            column_type: ColumnType::Serial,
            primary_key: true,
            nullable: false,
        }
    }

    /// Non-null column of the given type
    pub const fn required(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            primary_key: false,
            nullable: false,
        }
    }

    fn definition(&self) -> String {
        let mut sql = format!("\"{}\" {}", self.name, self.column_type.sql());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        sql
    }
}

/// A named unique constraint over one column
#[derive(Debug, Clone, Copy)]
pub struct UniqueConstraint {
    pub name: &'static str,
    pub column: &'static str,
}

/// Full description of a table
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
    pub unique: &'static [UniqueConstraint],
}

impl TableSchema {
    /// `CREATE TABLE IF NOT EXISTS` statement for the whole table
    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDef::definition).collect();
        parts.extend(self.unique.iter().map(|u| {
            format!("CONSTRAINT \"{}\" UNIQUE (\"{}\")", u.name, u.column)
        }));

        format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
            self.name,
            parts.join(", ")
        )
    }

    /// `ALTER TABLE ... ADD COLUMN IF NOT EXISTS` statements for columns that
    /// may be missing from an older table
    pub fn add_column_sql(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !c.primary_key)
            .map(|c| {
                format!(
                    "ALTER TABLE \"{}\" ADD COLUMN IF NOT EXISTS {}",
                    self.name,
                    c.definition()
                )
            })
            .collect()
    }

    /// `ALTER TABLE ... ADD CONSTRAINT` statement for one unique constraint
    pub fn add_unique_sql(&self, constraint: &UniqueConstraint) -> String {
        format!(
            "ALTER TABLE \"{}\" ADD CONSTRAINT \"{}\" UNIQUE (\"{}\")",
            self.name, constraint.name, constraint.column
        )
    }

    /// Column guarded by the named unique constraint
    pub fn unique_column(&self, constraint: &str) -> Option<&'static str> {
        self.unique
            .iter()
            .find(|u| u.name == constraint)
            .map(|u| u.column)
    }
}

/// Whether the table in the current schema already has a single-column
/// unique constraint on the column, whatever its name
const HAS_UNIQUE_SQL: &str = r#"
    SELECT EXISTS (
        SELECT 1
        FROM pg_constraint c
        JOIN pg_class t ON t.oid = c.conrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = c.conkey[1]
        WHERE c.contype = 'u'
          AND cardinality(c.conkey) = 1
          AND n.nspname = current_schema()
          AND t.relname = $1
          AND a.attname = $2
    )
"#;

/// Create the table, any missing columns and any missing unique constraints
///
/// All statements run in one transaction. Missing columns are added as
/// `NOT NULL` without a default, so adding one to a table that already holds
/// rows fails and aborts start-up; that table has to be migrated by hand.
/// Adding a unique constraint likewise fails while duplicates are present.
pub async fn synchronize(pool: &PgPool, schema: &TableSchema) -> DatabaseResult<()> {
    let sync_error = |source: sqlx::Error| DatabaseError::Synchronize {
        table: schema.name,
        source,
    };

    let mut tx = pool.begin().await.map_err(sync_error)?;

    sqlx::query(&schema.create_table_sql())
        .execute(&mut *tx)
        .await
        .map_err(sync_error)?;

    for statement in schema.add_column_sql() {
        sqlx::query(&statement)
            .execute(&mut *tx)
            .await
            .map_err(sync_error)?;
    }

    for constraint in schema.unique {
        let exists: bool = sqlx::query_scalar(HAS_UNIQUE_SQL)
            .bind(schema.name)
            .bind(constraint.column)
            .fetch_one(&mut *tx)
            .await
            .map_err(sync_error)?;

        if !exists {
            warn!(
                "Table {} has no unique constraint on {}, adding {}",
                schema.name, constraint.column, constraint.name
            );
            sqlx::query(&schema.add_unique_sql(constraint))
                .execute(&mut *tx)
                .await
                .map_err(sync_error)?;
        }
    }

    tx.commit().await.map_err(sync_error)?;

    info!("Schema synchronized for table {}", schema.name);
    Ok(())
}
