//! Generated file name audit queries.
//!
//! Rows are append-only; there is no uniqueness constraint.

use dossier_models::{now_timestamp, GeneratedFile};
use sqlx::SqliteExecutor;

use crate::Result;

/// Input for recording a generated file name.
#[derive(Debug, Clone)]
pub struct CreateGeneratedFile {
    pub filename: String,
    pub project_id: Option<i64>,
    pub file_type: String,
    pub file_path: Option<String>,
}

/// Record a generated file name.
pub async fn create_generated_file<'e, E>(executor: E, input: CreateGeneratedFile) -> Result<GeneratedFile>
where
    E: SqliteExecutor<'e>,
{
    let file = sqlx::query_as::<_, GeneratedFile>(
        r#"
        INSERT INTO generated_files (filename, project_id, file_type, created_date, file_path)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.filename)
    .bind(input.project_id)
    .bind(&input.file_type)
    .bind(now_timestamp())
    .bind(&input.file_path)
    .fetch_one(executor)
    .await?;

    Ok(file)
}

/// List generated file names, optionally for one project. Newest first.
pub async fn list_generated_files<'e, E>(executor: E, project_id: Option<i64>) -> Result<Vec<GeneratedFile>>
where
    E: SqliteExecutor<'e>,
{
    let files = match project_id {
        Some(project_id) => {
            sqlx::query_as::<_, GeneratedFile>(
                "SELECT * FROM generated_files WHERE project_id = ? ORDER BY created_date DESC, id DESC",
            )
            .bind(project_id)
            .fetch_all(executor)
            .await?
        }
        None => {
            sqlx::query_as::<_, GeneratedFile>(
                "SELECT * FROM generated_files ORDER BY created_date DESC, id DESC",
            )
            .fetch_all(executor)
            .await?
        }
    };

    Ok(files)
}
