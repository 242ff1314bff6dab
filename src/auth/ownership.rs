use uuid::Uuid;

use crate::error::AppError;
use crate::models::Task;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Decides whether `user_id` may read, update, or delete `task`.
/// Exactly one identity owns a task, so the check is a single id comparison.
pub fn authorize(user_id: Uuid, task: &Task) -> Access {
    if task.owner_id == user_id {
        Access::Allowed
    } else {
        Access::Denied
    }
}

/// Runs the ownership check and masks a denial as the same 404 a missing row
/// produces, so a non-owner cannot learn whether the task exists.
pub fn ensure_owner(user_id: Uuid, task: &Task) -> Result<(), AppError> {
    match authorize(user_id, task) {
        Access::Allowed => Ok(()),
        Access::Denied => Err(AppError::NotFound("Task not found".into())),
    }
}
