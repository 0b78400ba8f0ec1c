//! Structure database queries.
//!
//! A structure is a folder template that was materialized at a base path.
//! Names are unique across the store.

use dossier_models::{now_timestamp, Structure};
use dossier_storage::FolderTemplate;
use sqlx::SqliteExecutor;

use crate::{Error, Result};

use super::{unique_violation, DbPool};

/// Input for recording a new structure.
#[derive(Debug, Clone)]
pub struct CreateStructure {
    pub name: String,
    pub base_path: String,
    pub template: FolderTemplate,
}

/// Record a new structure. Fails with `AlreadyExists` on a duplicate name.
pub async fn create_structure<'e, E>(executor: E, input: CreateStructure) -> Result<Structure>
where
    E: SqliteExecutor<'e>,
{
    let now = now_timestamp();
    let structure_data = input.template.to_json()?;

    sqlx::query_as::<_, Structure>(
        r#"
        INSERT INTO structures (name, base_path, structure_data, created_date, last_modified)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.base_path)
    .bind(&structure_data)
    .bind(&now)
    .bind(&now)
    .fetch_one(executor)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some(_) => Error::AlreadyExists(format!("Structure named '{}' already exists", input.name)),
        None => Error::Database(e),
    })
}

/// Get a structure by ID.
pub async fn get_structure<'e, E>(executor: E, id: i64) -> Result<Structure>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Structure>("SELECT * FROM structures WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Structure not found: {}", id)))
}

/// Get a structure by its unique name.
pub async fn get_structure_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Structure>>
where
    E: SqliteExecutor<'e>,
{
    let structure = sqlx::query_as::<_, Structure>("SELECT * FROM structures WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    Ok(structure)
}

/// Check whether a structure name is taken.
pub async fn structure_name_exists<'e, E>(executor: E, name: &str) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM structures WHERE name = ?)")
        .bind(name)
        .fetch_one(executor)
        .await?;

    Ok(exists)
}

/// List all structures, newest first.
pub async fn list_structures<'e, E>(executor: E) -> Result<Vec<Structure>>
where
    E: SqliteExecutor<'e>,
{
    let structures = sqlx::query_as::<_, Structure>(
        "SELECT * FROM structures ORDER BY created_date DESC, id DESC",
    )
    .fetch_all(executor)
    .await?;

    Ok(structures)
}

/// Delete a structure that no longer owns any clients.
///
/// Deletion is restricted: while clients reference the structure this
/// returns `Conflict` and nothing is removed. Folders on disk are never
/// touched.
pub async fn delete_structure(pool: &DbPool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    get_structure(&mut *tx, id).await?;

    let clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE structure_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if clients > 0 {
        return Err(Error::Conflict(format!(
            "Structure {} still has {} client(s)",
            id, clients
        )));
    }

    sqlx::query("DELETE FROM structures WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(())
}

/// Parse a stored structure's template body.
pub fn structure_template(structure: &Structure) -> Result<FolderTemplate> {
    Ok(FolderTemplate::from_json(&structure.structure_data)?)
}
