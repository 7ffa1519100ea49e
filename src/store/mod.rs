//! Persistence seams.
//!
//! Handlers and the auth gateway only see the [`CredentialStore`] and
//! [`TaskStore`] traits. [`postgres::PgStore`] backs them with PostgreSQL,
//! [`memory`] keeps everything in process for local runs and tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskUpdate, User};

pub use memory::{MemoryCredentialStore, MemoryTaskStore};
pub use postgres::PgStore;

/// Storage for user credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Inserts a new user. Returns `AppError::Conflict` when the email is
    /// already taken; the check and the insert are a single atomic step.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;
}

/// Storage for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, task: Task) -> Result<Task, AppError>;

    /// All tasks, newest first.
    async fn list(&self) -> Result<Vec<Task>, AppError>;

    /// Returns `None` when no task has this id.
    async fn update(&self, id: Uuid, update: TaskUpdate) -> Result<Option<Task>, AppError>;

    /// Returns whether a task was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
