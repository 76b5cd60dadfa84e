/// Task endpoints
///
/// # Endpoints
///
/// - `GET /task` - list all tasks (public)
/// - `GET /task/:id` - fetch a single task (public)
/// - `POST /task` - create a task in an existing project
/// - `PUT /task/:id` - update title, description, status or assignee
/// - `DELETE /task/:id` - delete a task
///
/// Status moves freely between TODO, IN_PROGRESS and DONE in any direction,
/// including back from DONE. Creation requires the target project to exist
/// and rejects an unknown assignee up front rather than surfacing a foreign
/// key violation.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use projex_shared::{
    auth::middleware::AuthUser,
    models::{
        project::Project,
        task::{CreateTask, Task, TaskStatus, UpdateTask},
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Initial status, TODO when omitted
    pub status: Option<TaskStatus>,

    /// Project the task belongs to
    pub project_id: Uuid,

    /// Optional assignee
    pub assignee_id: Option<Uuid>,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee
    pub assignee_id: Option<Uuid>,
}

/// Message-only response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// List all tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = Task::list(&state.db).await?;
    Ok(Json(tasks))
}

/// Fetch a single task
///
/// # Errors
///
/// - `404` unknown task id
pub async fn get_task(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Create a task in an existing project
///
/// # Errors
///
/// - `400` validation failure
/// - `404` the target project does not exist
/// - `404` the requested assignee does not exist
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    if Project::find_by_id(&state.db, req.project_id).await?.is_none() {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    if let Some(assignee_id) = req.assignee_id {
        if User::find_by_id(&state.db, assignee_id).await?.is_none() {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            project_id: req.project_id,
            assignee_id: req.assignee_id,
            owner_id: auth.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task's title, description, status or assignee
///
/// # Errors
///
/// - `400` validation failure
/// - `404` unknown task id
/// - `404` the requested assignee does not exist
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let current = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if let Some(next) = req.status {
        // Never fires today; the board is any-to-any.
        if !current.status.can_transition_to(next) {
            return Err(ApiError::BadRequest(format!(
                "Cannot move task from {} to {}",
                current.status.as_str(),
                next.as_str()
            )));
        }
    }

    if let Some(assignee_id) = req.assignee_id {
        if User::find_by_id(&state.db, assignee_id).await?.is_none() {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
    }

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assignee_id: req.assignee_id,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404` unknown task id
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Task::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Task deleted".to_string(),
    }))
}
