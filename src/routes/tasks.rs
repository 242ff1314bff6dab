use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{ensure_owner, AuthenticatedUser};
use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskQuery, TaskUpdate};
use crate::store::Store;

/// Lists the authenticated user's tasks, newest first.
///
/// Listing filters by owner in the store query itself rather than checking
/// rows one by one; another user's tasks are never fetched. Supports an
/// optional `status` filter and `skip`/`limit` pagination.
#[get("")]
pub async fn get_tasks(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;

    let tasks = store
        .find_tasks_by_owner(user.0, query.status.clone(), query.skip, query.limit)
        .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// The owner is always stamped from the verified token; the payload has no
/// owner field, so a caller cannot create tasks for someone else.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    payload: web::Json<TaskCreate>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = store.insert_task(Task::new(payload.into_inner(), user.0)).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Fetches a single task by id. Non-owners get the same 404 as a missing id.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = load_owned_task(store.get_ref(), user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Applies a partial update to an owned task. Unset fields keep their values.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    payload: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let mut task = load_owned_task(store.get_ref(), user.0, path.into_inner()).await?;
    task.apply_update(payload.into_inner());

    let updated = store.update_task(task).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes an owned task.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = load_owned_task(store.get_ref(), user.0, path.into_inner()).await?;
    store.delete_task(task.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Loads a task and runs the ownership check. A missing row and a row owned
/// by someone else produce the identical 404.
async fn load_owned_task(
    store: &dyn Store,
    user_id: Uuid,
    task_id: Uuid,
) -> Result<Task, AppError> {
    let task = store
        .find_task_by_id(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    ensure_owner(user_id, &task)?;
    Ok(task)
}
