/// Project model and database operations
///
/// A project groups tasks and has exactly one owner. Deleting a project
/// cascades to its tasks at the database level.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project record
///
/// Wire format is camelCase (`ownerId`, `createdAt`).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// User who created the project
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Owner, resolved from the authenticated caller
    pub owner_id: Uuid,
}

/// Input for updating a project
///
/// Only non-None fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,
}

impl Project {
    /// Creates a new project owned by the given user
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, owner_id, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, owner_id, created_at, updated_at
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists projects owned by a user, newest first
    ///
    /// Used by the caller's composite profile read.
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, owner_id, created_at, updated_at
            FROM projects
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Updates a project, writing only the provided fields
    ///
    /// # Returns
    ///
    /// The updated project, or None if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, owner_id, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project by ID, cascading to its tasks
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the project did not exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_default_is_empty() {
        let update = UpdateProject::default();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
    }

    #[test]
    fn test_project_serializes_owner() {
        let project = Project {
            id: Uuid::new_v4(),
            title: "Launch".to_string(),
            description: None,
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["title"], "Launch");
        assert!(json["ownerId"].is_string());
    }
}
