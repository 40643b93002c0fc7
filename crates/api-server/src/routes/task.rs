//! Task API endpoints
//!
//! RESTful API for task CRUD operations: the active list, the history of
//! completed tasks, creation, full replace, completion toggling, deletion.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tasklist_core::task::{Task, TaskKind, TaskRepository};
use tasklist_core::Error as CoreError;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Body for POST /tasks
///
/// Every field deserializes as optional so that presence checks happen in
/// the handler, reported as 400 with a message naming the field, instead
/// of a generic extractor rejection.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub shop: Option<String>,
    #[serde(default)]
    pub extra: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Body for PUT /tasks/{id}, a full-field replace
///
/// `completed` is not accepted here; a replace always resets it to false.
#[derive(Debug, Deserialize)]
pub struct ReplaceTaskRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub shop: Option<String>,
    #[serde(default)]
    pub extra: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    pub completed: bool,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            name: task.name,
            kind: task.kind,
            shop: task.shop,
            extra: task.extra,
            completed: task.completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type RouteError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Error and validation helpers
// ============================================================================

fn bad_request(message: impl Into<String>) -> RouteError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn task_not_found(id: Uuid) -> RouteError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Task {} not found", id),
        }),
    )
}

/// Translate store errors into HTTP responses
fn map_store_error(error: CoreError) -> RouteError {
    let status = match &error {
        CoreError::TaskNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn require_name(name: Option<String>) -> Result<String, RouteError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        Some(_) => Err(bad_request("name cannot be empty")),
        None => Err(bad_request("name is required")),
    }
}

fn require_kind(kind: Option<String>) -> Result<TaskKind, RouteError> {
    let raw = kind.ok_or_else(|| bad_request("type is required"))?;
    TaskKind::from_str(&raw).map_err(map_store_error)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tasks - List tasks not yet completed
async fn list_active_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, RouteError> {
    let tasks = state
        .task_store()
        .find_by_completed(false)
        .await
        .map_err(map_store_error)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// GET /history - List completed tasks
async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, RouteError> {
    let tasks = state
        .task_store()
        .find_by_completed(true)
        .await
        .map_err(map_store_error)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// GET /tasks/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, RouteError> {
    let task = state.task_store().get(id).await.map_err(map_store_error)?;

    match task {
        Some(t) => Ok(Json(TaskResponse::from(t))),
        None => Err(task_not_found(id)),
    }
}

/// POST /tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), RouteError> {
    let name = require_name(req.name)?;
    let kind = require_kind(req.kind)?;
    let completed = req
        .completed
        .ok_or_else(|| bad_request("completed is required"))?;

    tracing::debug!(name = %name, kind = kind.as_str(), completed, "creating task");

    let mut task = Task::new(name, kind, completed);

    if let Some(shop) = req.shop {
        task = task.with_shop(shop);
    }

    if let Some(extra) = req.extra {
        task = task.with_extra(extra);
    }

    let created = state
        .task_store()
        .create(task)
        .await
        .map_err(map_store_error)?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

/// PUT /tasks/{id} - Replace the editable fields of a task
///
/// Absent optional fields clear the stored values, and `completed` is
/// unconditionally reset to false, whatever it was before.
async fn replace_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReplaceTaskRequest>,
) -> Result<Json<TaskResponse>, RouteError> {
    let name = require_name(req.name)?;
    let kind = require_kind(req.kind)?;

    let mut task = state
        .task_store()
        .get(id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| task_not_found(id))?;

    task.name = name;
    task.kind = kind;
    task.shop = req.shop;
    task.extra = req.extra;
    task.completed = false;

    let updated = state
        .task_store()
        .update(task)
        .await
        .map_err(map_store_error)?;

    Ok(Json(TaskResponse::from(updated)))
}

/// PUT /tasks/{id}/completed - Toggle the completed flag
///
/// Reads the current value and persists its negation, so the toggle works
/// in both directions.
async fn toggle_completed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, RouteError> {
    let mut task = state
        .task_store()
        .get(id)
        .await
        .map_err(map_store_error)?
        .ok_or_else(|| task_not_found(id))?;

    task.completed = !task.completed;

    let updated = state
        .task_store()
        .update(task)
        .await
        .map_err(map_store_error)?;

    Ok(Json(TaskResponse::from(updated)))
}

/// DELETE /tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteTaskResponse>, RouteError> {
    let deleted = state
        .task_store()
        .delete(id)
        .await
        .map_err(map_store_error)?;

    if deleted {
        Ok(Json(DeleteTaskResponse {
            message: format!("Task {} deleted", id),
        }))
    } else {
        Err(task_not_found(id))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_active_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(replace_task).delete(delete_task),
        )
        .route("/tasks/{id}/completed", put(toggle_completed))
        .route("/history", get(list_history))
}
