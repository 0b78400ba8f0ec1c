//! Project database queries.
//!
//! Project numbers and folder paths are both unique across the store.

use dossier_models::{now_timestamp, Project, ProjectStatus, ProjectWithClient};
use sqlx::SqliteExecutor;

use crate::{Error, Result};

use super::unique_violation;

/// Input for creating a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub project_number: String,
    pub client_id: i64,
    pub folder_path: String,
    pub description: Option<String>,
}

/// Input for updating a project.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub status: Option<ProjectStatus>,
    pub description: Option<String>,
}

const PROJECT_WITH_CLIENT: &str = r#"
    SELECT p.*, c.name AS client_name, c.type AS client_type
    FROM projects p
    JOIN clients c ON p.client_id = c.id
"#;

/// Create a new project with status `active`.
pub async fn create_project<'e, E>(executor: E, input: CreateProject) -> Result<Project>
where
    E: SqliteExecutor<'e>,
{
    let now = now_timestamp();

    sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (
            name, project_number, client_id, folder_path, status,
            created_date, last_modified, description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.project_number)
    .bind(input.client_id)
    .bind(&input.folder_path)
    .bind(ProjectStatus::Active.as_str())
    .bind(&now)
    .bind(&now)
    .bind(&input.description)
    .fetch_one(executor)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some(column) if column.ends_with("folder_path") => Error::AlreadyExists(format!(
            "Project folder '{}' is already registered",
            input.folder_path
        )),
        Some(_) => Error::AlreadyExists(format!(
            "Project number '{}' already exists",
            input.project_number
        )),
        None => Error::Database(e),
    })
}

/// Get a project by ID.
pub async fn get_project<'e, E>(executor: E, id: i64) -> Result<Project>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Project not found: {}", id)))
}

/// Get a project by its project number.
pub async fn get_project_by_number<'e, E>(executor: E, project_number: &str) -> Result<Option<Project>>
where
    E: SqliteExecutor<'e>,
{
    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE project_number = ?")
        .bind(project_number)
        .fetch_optional(executor)
        .await?;

    Ok(project)
}

/// Check whether a project number is taken.
pub async fn project_number_exists<'e, E>(executor: E, project_number: &str) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM projects WHERE project_number = ?)")
            .bind(project_number)
            .fetch_one(executor)
            .await?;

    Ok(exists)
}

/// Get a project joined with its client.
pub async fn get_project_with_client<'e, E>(executor: E, id: i64) -> Result<ProjectWithClient>
where
    E: SqliteExecutor<'e>,
{
    let query = format!("{} WHERE p.id = ?", PROJECT_WITH_CLIENT);

    sqlx::query_as::<_, ProjectWithClient>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Project not found: {}", id)))
}

/// List projects with their client, optionally for one client. Newest first.
pub async fn list_projects<'e, E>(executor: E, client_id: Option<i64>) -> Result<Vec<ProjectWithClient>>
where
    E: SqliteExecutor<'e>,
{
    let projects = match client_id {
        Some(client_id) => {
            let query = format!(
                "{} WHERE p.client_id = ? ORDER BY p.created_date DESC, p.id DESC",
                PROJECT_WITH_CLIENT
            );
            sqlx::query_as::<_, ProjectWithClient>(&query)
                .bind(client_id)
                .fetch_all(executor)
                .await?
        }
        None => {
            let query = format!("{} ORDER BY p.created_date DESC, p.id DESC", PROJECT_WITH_CLIENT);
            sqlx::query_as::<_, ProjectWithClient>(&query)
                .fetch_all(executor)
                .await?
        }
    };

    Ok(projects)
}

/// Update a project's status and/or description.
pub async fn update_project<'e, E>(executor: E, id: i64, input: UpdateProject) -> Result<Project>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects
        SET status = COALESCE(?, status),
            description = COALESCE(?, description),
            last_modified = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(input.status.map(|s| s.as_str()))
    .bind(&input.description)
    .bind(now_timestamp())
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Project not found: {}", id)))
}

/// All stored project numbers starting with `prefix`, as raw text.
///
/// Compares a literal prefix, so `_` is not a wildcard here.
pub async fn list_project_numbers_with_prefix<'e, E>(executor: E, prefix: &str) -> Result<Vec<String>>
where
    E: SqliteExecutor<'e>,
{
    let numbers = sqlx::query_scalar::<_, String>(
        r#"
        SELECT project_number FROM projects
        WHERE substr(project_number, 1, length(?)) = ?
        ORDER BY project_number
        "#,
    )
    .bind(prefix)
    .bind(prefix)
    .fetch_all(executor)
    .await?;

    Ok(numbers)
}
