/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - register a new user, returning a token
/// - `POST /auth/login` - authenticate and get a token
/// - `GET /auth/me` - the caller's profile with owned projects and tasks
///
/// Registration accepts an optional `adminKey`; when it matches the
/// server-side `ADMIN_KEY`, the new account gets the ADMIN role instead of
/// the default USER. Login failures for an unknown email and a wrong
/// password are indistinguishable so callers cannot enumerate accounts.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use projex_shared::{
    auth::{jwt, middleware::AuthUser, password},
    models::{
        project::Project,
        task::Task,
        user::{CreateUser, User, UserRole},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 2, message = "Name is too short"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Optional administrative registration key
    pub admin_key: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// The created user (password hash omitted)
    pub user: User,

    /// Session token (7 days)
    pub token: String,

    /// Human-readable confirmation
    pub message: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Public identity slice returned by login
#[derive(Debug, Serialize)]
pub struct LoginUser {
    /// User ID
    pub id: uuid::Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Human-readable confirmation
    pub message: String,

    /// The authenticated user
    pub user: LoginUser,

    /// Session token (7 days)
    pub token: String,
}

/// Composite profile returned by `GET /auth/me`
#[derive(Debug, Serialize)]
pub struct MeUser {
    /// The caller's account
    #[serde(flatten)]
    pub user: User,

    /// Projects the caller owns, newest first
    pub projects: Vec<Project>,

    /// Tasks the caller is assigned to or created, newest first
    pub tasks: Vec<Task>,
}

/// `GET /auth/me` response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// The caller with nested projects and tasks
    pub user: MeUser,
}

/// Register a new user
///
/// # Errors
///
/// - `400` validation failure, with per-field details
/// - `400` email already registered
/// - `500` hashing or persistence failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // Role elevation is gated on a server-held shared secret; an absent or
    // wrong key silently falls back to the default role.
    let role = match (req.admin_key.as_deref(), state.admin_registration_key()) {
        (Some(provided), Some(expected)) if provided == expected => UserRole::Admin,
        _ => UserRole::User,
    };

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role,
        },
    )
    .await?;

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            token,
            message: "Registration successful".to_string(),
        }),
    ))
}

/// Login
///
/// # Errors
///
/// - `400` validation failure
/// - `401` with the same body for unknown email and wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    // Same status and message for both failure modes; anything else lets a
    // caller probe which emails are registered.
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: LoginUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
        token,
    }))
}

/// The caller's profile with owned projects and assigned/created tasks
///
/// # Errors
///
/// - `401` missing or invalid token (handled by the guard)
/// - `404` the token's user no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let projects = Project::list_by_owner(&state.db, user.id).await?;
    let tasks = Task::list_for_user(&state.db, user.id).await?;

    Ok(Json(MeResponse {
        user: MeUser {
            user,
            projects,
            tasks,
        },
    }))
}
