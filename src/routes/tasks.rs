use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{StatusInput, TaskFilter, TaskInput, TaskPatch, TaskQuery, TaskStats},
    state::AppState,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Retrieves the authenticated user's tasks, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): `pending`, `in-progress`, `completed`, or `all`.
/// - `priority` (optional): `low`, `medium`, `high`, or `all`.
/// - `search` (optional): Case-insensitive substring of the title.
///
/// ## Responses:
/// - `200 OK`: `{tasks: [...]}`.
/// - `400 Bad Request`: Unknown status or priority filter.
/// - `401 Unauthorized`: Missing or invalid token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let filter = TaskFilter::try_from(query_params.into_inner())?;
    let tasks = state.tasks.list_by_owner(user.0.user_id, &filter).await?;

    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Counts of the authenticated user's tasks by status, plus how many are overdue.
#[get("/stats")]
pub async fn get_task_stats(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state
        .tasks
        .list_by_owner(user.0.user_id, &TaskFilter::default())
        .await?;

    Ok(HttpResponse::Ok().json(TaskStats::from_tasks(&tasks, Utc::now())))
}

/// Creates a new `pending` task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: Required, non-blank.
/// - `description` (optional): Defaults to the empty string.
/// - `dueDate`: Required. RFC 3339 or `YYYY-MM-DD`.
/// - `priority`: Required. `low`, `medium` or `high`.
///
/// ## Responses:
/// - `201 Created`: `{message, task}`.
/// - `400 Bad Request`: Missing or invalid fields.
/// - `401 Unauthorized`: Missing or invalid token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let new_task = task_data.into_inner().into_new_task()?;
    let task = state.tasks.create(user.0.user_id, new_task).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "task": task
    })))
}

/// Retrieves a single task owned by the authenticated user.
///
/// A task owned by someone else is reported exactly like a missing one.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get_owned(task_id.into_inner(), user.0.user_id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Replaces the editable fields of a task.
///
/// Takes the same body as `create_task`; an omitted description resets it to empty.
/// Status is left alone.
///
/// ## Responses:
/// - `200 OK`: `{message, task}`.
/// - `400 Bad Request`: Missing or invalid fields.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `404 Not Found`: Task absent or not owned by the caller.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let patch = TaskPatch::from(task_data.into_inner().into_new_task()?);
    let task = state
        .tasks
        .update_owned(task_id.into_inner(), user.0.user_id, patch)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated successfully",
        "task": task
    })))
}

/// Sets the status of a task. Any status may follow any other.
///
/// ## Responses:
/// - `200 OK`: `{message, task}`.
/// - `400 Bad Request`: Status missing or not one of `pending`, `in-progress`, `completed`.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `404 Not Found`: Task absent or not owned by the caller.
#[patch("/{id}/status")]
pub async fn update_task_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    status_data: web::Json<StatusInput>,
) -> Result<impl Responder, AppError> {
    let status = status_data
        .into_inner()
        .status
        .ok_or_else(|| AppError::ValidationError("Status is required".into()))?;

    let patch = TaskPatch {
        status: Some(status),
        ..Default::default()
    };
    let task = state
        .tasks
        .update_owned(task_id.into_inner(), user.0.user_id, patch)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task status updated successfully",
        "task": task
    })))
}

/// Deletes a task. Deletion is permanent.
///
/// ## Responses:
/// - `200 OK`: `{message}`.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `404 Not Found`: Task absent or not owned by the caller.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let removed = state
        .tasks
        .delete_owned(task_id.into_inner(), user.0.user_id)
        .await?;

    if !removed {
        return Err(task_not_found());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
