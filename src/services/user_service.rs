//! User service - account directory operations.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::is_valid_role;
use crate::domain::{UpdateUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Fetch a user by id
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Full user listing (admin)
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Update name and/or role
    async fn update_user(&self, id: Uuid, input: UpdateUser) -> AppResult<User>;

    /// Hard-delete a user row
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn update_user(&self, id: Uuid, input: UpdateUser) -> AppResult<User> {
        if let Some(role) = input.role.as_deref() {
            if !is_valid_role(role) {
                return Err(AppError::validation(format!("Invalid role: {role}")));
            }
        }

        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let updated = self.uow.users().update(id, input.name, input.role).await?;

        tracing::info!(user_id = %id, "User updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.uow.users().delete(id).await?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
