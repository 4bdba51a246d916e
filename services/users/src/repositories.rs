//! Repositories for database operations

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CreateUserRequest, UpdateUserRequest, User};

#[cfg(test)]
pub mod in_memory;
pub mod user;

pub use user::{USER_TABLE, UserRepository};

/// Errors raised by a [`UserStore`]
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A unique column already holds the value
    #[error("User with this {field} already exists")]
    Conflict { field: &'static str },

    /// Any other storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations on user records
///
/// Implementations enforce email and phone uniqueness atomically with the
/// write itself.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return it with its generated id
    async fn create(&self, new_user: &CreateUserRequest) -> Result<User, RepositoryError>;

    /// All users ordered by id
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// User with the given id, if any
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError>;

    /// Replace the supplied fields; `None` when no row has the id
    async fn update(
        &self,
        id: i32,
        changes: &UpdateUserRequest,
    ) -> Result<Option<User>, RepositoryError>;

    /// Delete the row; `false` when no row has the id
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;

    /// Whether the backing store answers
    async fn health_check(&self) -> bool;
}
