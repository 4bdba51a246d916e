//! PostgreSQL user repository

use async_trait::async_trait;
use common::schema::{ColumnDef, ColumnType, TableSchema, UniqueConstraint};
use sqlx::{PgPool, postgres::PgDatabaseError};

use super::{RepositoryError, UserStore};
use crate::models::{CreateUserRequest, UpdateUserRequest, User};

/// Table backing [`UserRepository`]
pub const USER_TABLE: TableSchema = TableSchema {
    name: "user_entity",
    columns: &[
        ColumnDef::primary_key("id"),
        ColumnDef::required("email", ColumnType::Varchar),
        ColumnDef::required("phone", ColumnType::Varchar),
        ColumnDef::required("password", ColumnType::Varchar),
    ],
    unique: &[
        UniqueConstraint {
            name: "UQ_user_entity_email",
            column: "email",
        },
        UniqueConstraint {
            name: "UQ_user_entity_phone",
            column: "phone",
        },
    ],
};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate unique violations on `user_entity` into conflicts
///
/// The constraint name is used when it is one of ours; tables created by
/// other tooling carry generated names, so the violation detail
/// (`Key (email)=(...) already exists.`) is checked as a fallback.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            let by_name = db_err
                .constraint()
                .and_then(|name| USER_TABLE.unique_column(name));

            let by_detail = || {
                let detail = db_err.try_downcast_ref::<PgDatabaseError>()?.detail()?;
                USER_TABLE
                    .unique
                    .iter()
                    .find(|u| detail.contains(&format!("({})=", u.column)))
                    .map(|u| u.column)
            };

            if let Some(field) = by_name.or_else(by_detail) {
                return RepositoryError::Conflict { field };
            }
        }
    }

    RepositoryError::Database(err)
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: &CreateUserRequest) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO user_entity (email, phone, password)
            VALUES ($1, $2, $3)
            RETURNING id, email, phone, password
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&new_user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, phone, password
            FROM user_entity
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, phone, password
            FROM user_entity
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateUserRequest,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE user_entity
            SET email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                password = COALESCE($4, password)
            WHERE id = $1
            RETURNING id, email, phone, password
            "#,
        )
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.password.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(user)
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_entity
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        common::database::health_check(&self.pool).await
    }
}
