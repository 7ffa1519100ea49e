use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskInput, TaskUpdate},
    store::TaskStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Lists all tasks, newest first.
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("")]
pub async fn get_tasks(tasks: web::Data<dyn TaskStore>) -> Result<impl Responder, AppError> {
    let tasks = tasks.list().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task.
///
/// ## Request Body:
/// - `title`: required, non-empty.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: `title` missing or empty.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[post("")]
pub async fn create_task(
    tasks: web::Data<dyn TaskStore>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data
        .validate()
        .map_err(|_| AppError::BadRequest("Title is required".into()))?;

    let task = tasks.create(Task::new(task_data.into_inner())).await?;
    log::info!("Task {} created by {}", task.id, user.email);

    Ok(HttpResponse::Created().json(task))
}

/// Updates `title` and/or `completed` of a task.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: an empty `title`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no task with this id.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<dyn TaskStore>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data
        .validate()
        .map_err(|_| AppError::BadRequest("Title must not be empty".into()))?;

    match tasks
        .update(task_id.into_inner(), task_data.into_inner())
        .await?
    {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted"}`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no task with this id.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<dyn TaskStore>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    if !tasks.delete(task_id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    log::info!("Task {} deleted by {}", task_id, user.email);
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
