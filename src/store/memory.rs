use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskStatus, User};
use crate::store::Store;

/// In-memory [`Store`] used by the integration tests and local development.
///
/// Each table is a `Mutex<HashMap>`; the uniqueness check and insert for an
/// identity happen under one lock acquisition, which gives this backend the
/// same atomic-insert guarantee the unique indexes give Postgres.
#[derive(Default)]
pub struct MemStore {
    users: Mutex<HashMap<Uuid, User>>,
    tasks: Mutex<HashMap<Uuid, Task>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl Store for MemStore {
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|u| eq_ignore_case(&u.email, email))
            .cloned())
    }

    async fn find_identity_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|u| eq_ignore_case(&u.username, username))
            .cloned())
    }

    async fn find_identity_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn insert_identity(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| eq_ignore_case(&u.email, &user.email)) {
            return Err(AppError::DuplicateEmail);
        }
        if users
            .values()
            .any(|u| eq_ignore_case(&u.username, &user.username))
        {
            return Err(AppError::DuplicateUsername);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_identity(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if !users.contains_key(&user.id) {
            return Err(AppError::NotFound("User not found".into()));
        }
        if users
            .values()
            .any(|u| u.id != user.id && eq_ignore_case(&u.email, &user.email))
        {
            return Err(AppError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_tasks_by_owner(
        &self,
        owner_id: Uuid,
        status: Option<TaskStatus>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.lock().unwrap();
        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.owner_id == owner_id)
            .filter(|t| status.as_ref().map_or(true, |s| t.status == *s))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn find_task_by_id(&self, task_id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks.get(&task_id).cloned())
    }

    async fn insert_task(&self, task: Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(&self, task: Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.lock().unwrap();
        if !tasks.contains_key(&task.id) {
            return Err(AppError::NotFound("Task not found".into()));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete_task(&self, task_id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.lock().unwrap();
        Ok(tasks.remove(&task_id).is_some())
    }
}
