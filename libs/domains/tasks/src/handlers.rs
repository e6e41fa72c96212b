use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{ErrorResponse, IdPath, ValidatedJson};
use serde_json::{Map, Value};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task};
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// OpenAPI documentation for the Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, create_task, get_task, update_task, delete_task),
    components(schemas(Task, CreateTask, ErrorResponse)),
    tags(
        (name = "Tasks", description = "Task management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the tasks router with all HTTP endpoints
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_tasks::<R>).post(create_task::<R>))
        .route(
            "/{id}",
            get(get_task::<R>)
                .patch(update_task::<R>)
                .delete(delete_task::<R>),
        )
        .with_state(shared_service)
}

/// List all tasks
#[utoipa::path(
    get,
    path = "",
    tag = "Tasks",
    responses(
        (status = 200, description = "All stored tasks in listing order", body = Vec<Task>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
) -> TaskResult<Json<Vec<Task>>> {
    let tasks = service.list_tasks().await?;
    Ok(Json(tasks))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "",
    tag = "Tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, description = "Missing or blank title", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 404, description = "No task with that id", body = ErrorResponse)
    )
)]
async fn get_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
) -> TaskResult<Json<Task>> {
    let task = service.get_task(id).await?;
    Ok(Json(task))
}

/// Partially update a task
///
/// Only keys present in the body are touched; unrecognized keys are ignored.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, description = "A supplied field failed validation", body = ErrorResponse),
        (status = 404, description = "No task with that id", body = ErrorResponse)
    )
)]
async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> TaskResult<Json<Task>> {
    let Json(fields) = payload.map_err(|e| TaskError::Validation(e.body_text()))?;
    let task = service.update_task(id, fields).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Tasks",
    params(
        ("id" = i64, Path, description = "Task id")
    ),
    responses(
        (status = 204, description = "Task deleted successfully"),
        (status = 404, description = "No task with that id", body = ErrorResponse)
    )
)]
async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    IdPath(id): IdPath,
) -> TaskResult<impl IntoResponse> {
    service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
