use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};
use crate::store::Store;

const USER_COLUMNS: &str =
    "id, email, username, full_name, password_hash, is_active, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, owner_id, created_at, updated_at";

/// Postgres-backed [`Store`] over a shared connection pool.
///
/// Identity lookups go through `lower(...)` so they match the
/// case-insensitive unique indexes; a unique-constraint violation on insert
/// or update is translated back into the corresponding conflict error by
/// index name.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Maps a unique-index violation to its conflict variant. Any other
    /// database failure passes through as a generic database error.
    fn map_unique_violation(error: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(ref db_err) = error {
            match db_err.constraint() {
                Some("users_email_lower_idx") => return AppError::DuplicateEmail,
                Some("users_username_lower_idx") => return AppError::DuplicateUsername,
                _ => {}
            }
        }
        AppError::from(error)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1)",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_identity_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users WHERE lower(username) = lower($1)",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert_identity(&self, user: User) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, email, username, full_name, password_hash, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.full_name)
            .bind(&user.password_hash)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_unique_violation)
    }

    async fn update_identity(&self, user: User) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET email = $2, full_name = $3, is_active = $4, updated_at = $5 \
             WHERE id = $1 \
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(user.is_active)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_unique_violation)
    }

    async fn find_tasks_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<TaskStatus>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM tasks WHERE owner_id = $1 AND status = $2 \
                     ORDER BY created_at DESC OFFSET $3 LIMIT $4",
                    TASK_COLUMNS
                );
                sqlx::query_as::<_, Task>(&sql)
                    .bind(owner_id)
                    .bind(status)
                    .bind(skip)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM tasks WHERE owner_id = $1 \
                     ORDER BY created_at DESC OFFSET $2 LIMIT $3",
                    TASK_COLUMNS
                );
                sqlx::query_as::<_, Task>(&sql)
                    .bind(owner_id)
                    .bind(skip)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(tasks)
    }

    async fn find_task_by_id(&self, task_id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn insert_task(&self, task: Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, title, description, status, priority, due_date, owner_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.due_date)
            .bind(task.owner_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update_task(&self, task: Task) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks SET title = $2, description = $3, status = $4, priority = $5, \
             due_date = $6, updated_at = $7 \
             WHERE id = $1 \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.due_date)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn delete_task(&self, task_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
