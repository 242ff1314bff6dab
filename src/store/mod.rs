//!
//! # Persistence Interface
//!
//! The rest of the application talks to storage through the [`Store`] trait:
//! identity lookups and inserts for the auth service, and owner-scoped task
//! queries for the task routes. Two backends implement it: [`PgStore`] for
//! production and [`MemStore`] for tests and local development.

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};

/// Storage operations consumed by the auth service and the task routes.
///
/// Email and username lookups are case-insensitive, matching the uniqueness
/// invariant on identities. `insert_identity` is atomic with respect to that
/// invariant: the backend's own uniqueness guard (a unique index for Postgres,
/// a single lock for the in-memory table) is the authoritative check, and a
/// concurrent duplicate insert fails with the corresponding conflict error.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_identity_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Inserts a new identity. Fails with `DuplicateEmail` or
    /// `DuplicateUsername` if the row would violate uniqueness.
    async fn insert_identity(&self, user: User) -> Result<User, AppError>;

    /// Persists profile changes to an existing identity. Email uniqueness is
    /// enforced the same way as on insert.
    async fn update_identity(&self, user: User) -> Result<User, AppError>;

    /// Lists tasks owned by `owner_id`, newest first, optionally filtered by
    /// status, with `skip`/`limit` pagination. Listing never sees another
    /// owner's rows; filtering happens in the query, not per row afterwards.
    async fn find_tasks_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<TaskStatus>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, AppError>;

    async fn find_task_by_id(&self, task_id: Uuid) -> Result<Option<Task>, AppError>;

    async fn insert_task(&self, task: Task) -> Result<Task, AppError>;

    async fn update_task(&self, task: Task) -> Result<Task, AppError>;

    /// Deletes a task row. Returns whether a row existed.
    async fn delete_task(&self, task_id: Uuid) -> Result<bool, AppError>;
}
