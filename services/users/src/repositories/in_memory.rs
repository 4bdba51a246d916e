//! In-memory user store used by the service and route tests

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{RepositoryError, UserStore};
use crate::models::{CreateUserRequest, UpdateUserRequest, User};

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    users: BTreeMap<i32, User>,
}

impl Inner {
    /// First unique column the values collide on, ignoring row `skip`
    fn conflict(&self, email: &str, phone: &str, skip: Option<i32>) -> Option<&'static str> {
        let others = || self.users.values().filter(move |u| Some(u.id) != skip);

        if others().any(|u| u.email == email) {
            Some("email")
        } else if others().any(|u| u.phone == phone) {
            Some("phone")
        } else {
            None
        }
    }
}

/// In-memory implementation of [`UserStore`]
///
/// Ids start at 1 and are never reused, like a `SERIAL` column.
#[derive(Debug)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
    healthy: bool,
}

impl InMemoryUserStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            healthy: true,
        }
    }

    /// Store whose health check always fails
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Number of stored users
    pub async fn count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: &CreateUserRequest) -> Result<User, RepositoryError> {
        let mut inner = self.inner.write().await;

        if let Some(field) = inner.conflict(&new_user.email, &new_user.phone, None) {
            return Err(RepositoryError::Conflict { field });
        }

        inner.last_id += 1;
        let user = User {
            id: inner.last_id,
            email: new_user.email.clone(),
            phone: new_user.phone.clone(),
            password: new_user.password.clone(),
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i32,
        changes: &UpdateUserRequest,
    ) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.inner.write().await;

        let Some(current) = inner.users.get(&id) else {
            return Ok(None);
        };

        let updated = User {
            id,
            email: changes.email.clone().unwrap_or_else(|| current.email.clone()),
            phone: changes.phone.clone().unwrap_or_else(|| current.phone.clone()),
            password: changes
                .password
                .clone()
                .unwrap_or_else(|| current.password.clone()),
        };

        if let Some(field) = inner.conflict(&updated.email, &updated.phone, Some(id)) {
            return Err(RepositoryError::Conflict { field });
        }

        inner.users.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}
