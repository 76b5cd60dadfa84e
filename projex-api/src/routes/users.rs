/// User management endpoints
///
/// # Endpoints
///
/// - `GET /users` - list all users
/// - `GET /users/:id` - fetch a single user
/// - `PUT /users/:id` - update name, email, password or role
/// - `DELETE /users/:id` - delete a user with no remaining tasks
///
/// Deletion refuses while the user is still the assignee or creator of any
/// task; callers must reassign first.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use projex_shared::{
    auth::password,
    models::{
        task::Task,
        user::{UpdateUser, User, UserRole},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Update user request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 2, message = "Name is too short"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    /// New password (stored hashed)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    /// New role; anything outside the enum is rejected at deserialization
    pub role: Option<UserRole>,
}

/// User list response
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    /// All users, newest first
    pub users: Vec<User>,

    /// Human-readable confirmation
    pub message: String,
}

/// Single-user response with a confirmation message
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// The affected user
    pub user: User,

    /// Human-readable confirmation
    pub message: String,
}

/// Message-only response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UserListResponse>> {
    let users = User::list(&state.db).await?;

    Ok(Json(UserListResponse {
        users,
        message: "Users fetched successfully".to_string(),
    }))
}

/// Fetch a single user
///
/// # Errors
///
/// - `404` unknown user id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        user,
        message: "User fetched successfully".to_string(),
    }))
}

/// Update a user's name, email, password or role
///
/// # Errors
///
/// - `400` validation failure
/// - `400` new email already belongs to another user
/// - `404` unknown user id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    if let Some(email) = &req.email {
        if let Some(existing) = User::find_by_email(&state.db, email).await? {
            if existing.id != id {
                return Err(ApiError::Conflict("Email already taken".to_string()));
            }
        }
    }

    let password_hash = match req.password {
        Some(password) => Some(password::hash_password(&password)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        user,
        message: "User updated successfully".to_string(),
    }))
}

/// Delete a user
///
/// # Errors
///
/// - `404` unknown user id
/// - `400` user still has tasks assigned or created
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    // Refuse instead of orphaning or cascading; task history stays intact
    // until someone reassigns it.
    if Task::count_for_user(&state.db, id).await? > 0 {
        return Err(ApiError::Dependency(
            "Cannot delete user with assigned tasks. Please reassign tasks first.".to_string(),
        ));
    }

    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
