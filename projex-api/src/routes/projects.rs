/// Project endpoints
///
/// # Endpoints
///
/// - `GET /projects` - list all projects (public)
/// - `GET /projects/:id` - a project with its owner and tasks (public)
/// - `POST /projects` - create a project owned by the caller
/// - `PUT /projects/:id` - update title or description
/// - `DELETE /projects/:id` - delete a project and its tasks
///
/// Reads are public. Writes require a valid token but not ownership; any
/// authenticated user may update or delete any project.
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
        project::{CreateProject, Project, UpdateProject},
        task::Task,
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project title
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,
}

/// Update project request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New title
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,
}

/// Project detail with its owner and tasks
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    /// The project itself
    #[serde(flatten)]
    pub project: Project,

    /// The owning user, if the account still exists
    pub owner: Option<User>,

    /// Tasks in this project, newest first
    pub tasks: Vec<Task>,
}

/// Message-only response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// List all projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list(&state.db).await?;
    Ok(Json(projects))
}

/// A project with its owner and tasks
///
/// # Errors
///
/// - `404` unknown project id
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectDetail>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let owner = User::find_by_id(&state.db, project.owner_id).await?;
    let tasks = Task::list_by_project(&state.db, project.id).await?;

    Ok(Json(ProjectDetail {
        project,
        owner,
        tasks,
    }))
}

/// Create a project owned by the caller
///
/// # Errors
///
/// - `400` validation failure
/// - `401` missing or invalid token (handled by the guard)
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            title: req.title,
            description: req.description,
            owner_id: auth.id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Update a project's title or description
///
/// # Errors
///
/// - `400` validation failure
/// - `404` unknown project id
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = Project::update(
        &state.db,
        id,
        UpdateProject {
            title: req.title,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Delete a project and, via cascade, its tasks
///
/// # Errors
///
/// - `404` unknown project id
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if !Project::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Project deleted".to_string(),
    }))
}
