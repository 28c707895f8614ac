//! Storage backends.
//!
//! Handlers only ever see the [`UserStore`] and [`TaskStore`] traits. Every task operation
//! takes the owner id and filters on it, so a task owned by someone else behaves exactly
//! like a task that does not exist.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskFilter, TaskPatch, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already on file.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    /// Exact, case-sensitive match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Round-trip to the backend, used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, owner: Uuid, task: NewTask) -> Result<Task, AppError>;

    /// Newest first. A fresh query on every call.
    async fn list_by_owner(&self, owner: Uuid, filter: &TaskFilter)
        -> Result<Vec<Task>, AppError>;

    async fn get_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError>;

    /// Applies the supplied fields and bumps `updated_at`. `None` when not owned or absent.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError>;

    /// `true` when a record was removed.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError>;
}
