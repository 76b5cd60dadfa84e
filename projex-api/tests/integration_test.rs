/// Integration tests for the ProjeX API
///
/// These tests verify the full system works end-to-end against a real
/// PostgreSQL database:
/// - Registration and login, including the duplicate-email and
///   wrong-password paths
/// - Token enforcement on protected routes
/// - Project and task lifecycle with free status movement
/// - User deletion blocked while tasks reference the user
mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

/// Registering the same email twice fails the second time
#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let email = format!("dup-{}@example.com", uuid::Uuid::new_v4());
    let body = json!({
        "name": "First",
        "email": email,
        "password": "secret1"
    });

    let (status, first) = ctx.request("POST", "/auth/register", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["message"], "Registration successful");
    assert!(first["token"].is_string());
    assert!(first["user"]["passwordHash"].is_null());

    let (status, second) = ctx.request("POST", "/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(second["message"], "User already exists");

    let user_id = first["user"]["id"].as_str().unwrap().parse().unwrap();
    common::delete_test_user(&ctx.db, user_id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

/// Unknown email and wrong password fail identically
#[tokio::test]
async fn test_login_failures_indistinguishable() {
    let ctx = TestContext::new().await.unwrap();

    let (status_unknown, body_unknown) = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({
                "email": format!("nobody-{}@example.com", uuid::Uuid::new_v4()),
                "password": "secret1"
            })),
        )
        .await;

    let (status_wrong, body_wrong) = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({
                "email": ctx.user.email,
                "password": "not-the-password"
            })),
        )
        .await;

    assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
    assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(body_unknown["message"], body_wrong["message"]);
    assert_eq!(body_unknown["message"], "Invalid email or password");

    ctx.cleanup().await.unwrap();
}

/// Correct credentials return a token that the guard accepts
#[tokio::test]
async fn test_login_and_me() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({
                "email": ctx.user.email,
                "password": common::TEST_PASSWORD
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = ctx.request("GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], ctx.user.id.to_string());
    assert!(body["user"]["projects"].is_array());
    assert!(body["user"]["tasks"].is_array());
    assert!(body["user"]["passwordHash"].is_null());

    ctx.cleanup().await.unwrap();
}

/// Protected routes reject missing and malformed tokens
#[tokio::test]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    let body = json!({ "title": "No token" });

    let (status, _) = ctx.request("POST", "/projects", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, response) = ctx
        .request("POST", "/projects", Some("garbage-token"), Some(body))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "The token you provided is not valid");

    ctx.cleanup().await.unwrap();
}

/// Full lifecycle: project, task, status movement in both directions
#[tokio::test]
async fn test_project_and_task_lifecycle() {
    let ctx = TestContext::new().await.unwrap();

    let (status, project) = ctx
        .request(
            "POST",
            "/projects",
            Some(&ctx.token),
            Some(json!({
                "title": "Release planning",
                "description": "Q3 scope"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["ownerId"], ctx.user.id.to_string());
    let project_id = project["id"].as_str().unwrap().to_string();

    let (status, task) = ctx
        .request(
            "POST",
            "/task",
            Some(&ctx.token),
            Some(json!({
                "title": "Write changelog",
                "projectId": project_id,
                "assigneeId": ctx.user.id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "TODO");
    let task_id = task["id"].as_str().unwrap().to_string();
    let created_updated_at = task["updatedAt"].as_str().unwrap().to_string();

    // Forward through the normal flow
    for next in ["IN_PROGRESS", "DONE"] {
        let (status, task) = ctx
            .request(
                "PUT",
                &format!("/task/{}", task_id),
                Some(&ctx.token),
                Some(json!({ "status": next })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(task["status"], next);
    }

    // And straight back again; no transition is forbidden
    let (status, task) = ctx
        .request(
            "PUT",
            &format!("/task/{}", task_id),
            Some(&ctx.token),
            Some(json!({ "status": "TODO" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "TODO");

    // Each status write strictly advances updatedAt.
    let before: chrono::DateTime<chrono::Utc> = created_updated_at.parse().unwrap();
    let after: chrono::DateTime<chrono::Utc> =
        task["updatedAt"].as_str().unwrap().parse().unwrap();
    assert!(after > before);

    // Project detail carries the owner and the task
    let (status, detail) = ctx
        .request("GET", &format!("/projects/{}", project_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["owner"]["id"], ctx.user.id.to_string());
    assert_eq!(detail["tasks"].as_array().unwrap().len(), 1);

    let (status, body) = ctx
        .request("DELETE", &format!("/task/{}", task_id), Some(&ctx.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted");

    let (status, body) = ctx
        .request(
            "DELETE",
            &format!("/projects/{}", project_id),
            Some(&ctx.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted");

    ctx.cleanup().await.unwrap();
}

/// An unknown status value is rejected before reaching the database
#[tokio::test]
async fn test_unknown_status_rejected() {
    let ctx = TestContext::new().await.unwrap();

    let (_, project) = ctx
        .request(
            "POST",
            "/projects",
            Some(&ctx.token),
            Some(json!({ "title": "Status project" })),
        )
        .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let (_, task) = ctx
        .request(
            "POST",
            "/task",
            Some(&ctx.token),
            Some(json!({ "title": "Status task", "projectId": project_id })),
        )
        .await;
    let task_id = task["id"].as_str().unwrap();

    // Serde rejects the unknown variant before the handler runs.
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/task/{}", task_id),
            Some(&ctx.token),
            Some(json!({ "status": "IN_REVIEW" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

/// A user's role can be changed after registration, within the closed enum
#[tokio::test]
async fn test_role_update() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/users/{}", ctx.user.id),
            None,
            Some(json!({ "role": "ADMIN" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "ADMIN");

    let (status, body) = ctx
        .request("GET", &format!("/users/{}", ctx.user.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "ADMIN");

    // Anything outside the enum never reaches the database.
    let (status, _) = ctx
        .request(
            "PUT",
            &format!("/users/{}", ctx.user.id),
            None,
            Some(json!({ "role": "SUPERUSER" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}

/// Fetching a single user wraps the record with a confirmation message
#[tokio::test]
async fn test_get_user_response_shape() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request("GET", &format!("/users/{}", ctx.user.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User fetched successfully");
    assert_eq!(body["user"]["id"], ctx.user.id.to_string());
    assert!(body["user"]["passwordHash"].is_null());

    let (status, body) = ctx
        .request("GET", &format!("/users/{}", uuid::Uuid::new_v4()), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    ctx.cleanup().await.unwrap();
}

/// Creating a task against a missing project is a 404, not a 500
#[tokio::test]
async fn test_task_requires_existing_project() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/task",
            Some(&ctx.token),
            Some(json!({
                "title": "Orphan task",
                "projectId": uuid::Uuid::new_v4()
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Project not found");

    ctx.cleanup().await.unwrap();
}

/// A user with tasks cannot be deleted until the tasks are gone
#[tokio::test]
async fn test_user_deletion_blocked_by_tasks() {
    let ctx = TestContext::new().await.unwrap();

    let (_, project) = ctx
        .request(
            "POST",
            "/projects",
            Some(&ctx.token),
            Some(json!({ "title": "Deletion project" })),
        )
        .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let (_, task) = ctx
        .request(
            "POST",
            "/task",
            Some(&ctx.token),
            Some(json!({ "title": "Blocking task", "projectId": project_id })),
        )
        .await;
    let task_id = task["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .request("DELETE", &format!("/users/{}", ctx.user.id), None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot delete user with assigned tasks. Please reassign tasks first."
    );

    let (status, _) = ctx
        .request("DELETE", &format!("/task/{}", task_id), Some(&ctx.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .request("DELETE", &format!("/users/{}", ctx.user.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
}

/// Any authenticated user may modify any project; writes are workspace-wide
#[tokio::test]
async fn test_cross_user_project_update_allowed() {
    let ctx = TestContext::new().await.unwrap();

    let (_, project) = ctx
        .request(
            "POST",
            "/projects",
            Some(&ctx.token),
            Some(json!({ "title": "Shared project" })),
        )
        .await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let other = common::create_test_user(
        &ctx.db,
        "Other User",
        projex_shared::models::user::UserRole::User,
    )
    .await
    .unwrap();
    let other_token = ctx.token_for(other.id);

    let (status, updated) = ctx
        .request(
            "PUT",
            &format!("/projects/{}", project_id),
            Some(&other_token),
            Some(json!({ "title": "Renamed by someone else" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Renamed by someone else");
    assert_eq!(updated["ownerId"], ctx.user.id.to_string());

    common::delete_test_user(&ctx.db, other.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

/// Registration with the configured admin key yields an ADMIN account
#[tokio::test]
async fn test_admin_key_elevates_role() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Admin Person",
                "email": format!("admin-{}@example.com", uuid::Uuid::new_v4()),
                "password": "secret1",
                "adminKey": "test-admin-key"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "ADMIN");
    let admin_id = body["user"]["id"].as_str().unwrap().parse().unwrap();

    // A wrong key quietly falls back to USER instead of failing
    let (status, body) = ctx
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Wannabe Admin",
                "email": format!("user-{}@example.com", uuid::Uuid::new_v4()),
                "password": "secret1",
                "adminKey": "wrong-key"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "USER");
    let user_id = body["user"]["id"].as_str().unwrap().parse().unwrap();

    common::delete_test_user(&ctx.db, admin_id).await.unwrap();
    common::delete_test_user(&ctx.db, user_id).await.unwrap();
    ctx.cleanup().await.unwrap();
}

/// Validation failures carry per-field details
#[tokio::test]
async fn test_validation_details() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "A",
                "email": "not-an-email",
                "password": "short"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    let details = body["details"].as_array().unwrap();
    let fields: Vec<&str> = details
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));

    ctx.cleanup().await.unwrap();
}

/// Changing an email to one another user already holds is rejected
#[tokio::test]
async fn test_email_change_conflict() {
    let ctx = TestContext::new().await.unwrap();

    let other = common::create_test_user(
        &ctx.db,
        "Email Holder",
        projex_shared::models::user::UserRole::User,
    )
    .await
    .unwrap();

    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/users/{}", ctx.user.id),
            None,
            Some(json!({ "email": other.email })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already taken");

    // Setting it to its current value is a no-op, not a conflict
    let (status, body) = ctx
        .request(
            "PUT",
            &format!("/users/{}", ctx.user.id),
            None,
            Some(json!({ "email": ctx.user.email, "name": "Renamed User" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["user"]["name"], "Renamed User");

    common::delete_test_user(&ctx.db, other.id).await.unwrap();
    ctx.cleanup().await.unwrap();
}
