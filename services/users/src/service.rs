//! User service: validation gate in front of the store

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::{
    models::{CreateUserRequest, UpdateUserRequest, User},
    repositories::{RepositoryError, UserStore},
    validation::{self, ValidationError},
};

/// Failures reported by [`UserService`]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed input; nothing was written
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Email or phone already taken
    #[error("{0}")]
    Conflict(String),

    /// No user with the requested id
    #[error("User not found")]
    NotFound,

    /// Unclassified storage failure
    #[error("Internal Server Error")]
    Internal(#[source] RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { .. } => ServiceError::Conflict(err.to_string()),
            RepositoryError::Database(_) => ServiceError::Internal(err),
        }
    }
}

/// User service
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Create a new user service on top of a store
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Validate and insert a new user
    pub async fn create(&self, payload: &CreateUserRequest) -> Result<User, ServiceError> {
        validation::validate_create(payload)?;

        let user = self.store.create(payload).await?;
        info!("Created user {}", user.id);
        Ok(user)
    }

    /// All users in insertion order
    pub async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.find_all().await?)
    }

    /// User with the given id
    pub async fn find_one(&self, id: i32) -> Result<User, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Validate supplied fields and apply them to an existing user
    pub async fn update(&self, id: i32, payload: &UpdateUserRequest) -> Result<User, ServiceError> {
        validation::validate_update(payload)?;

        let user = self
            .store
            .update(id, payload)
            .await?
            .ok_or(ServiceError::NotFound)?;

        info!("Updated user {}", id);
        Ok(user)
    }

    /// Hard-delete a user
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound);
        }

        info!("Deleted user {}", id);
        Ok(())
    }

    /// Whether the store is reachable
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}
