//! Client database queries.

use dossier_models::{now_timestamp, Client, ClientType};
use sqlx::SqliteExecutor;

use crate::{Error, Result};

use super::{unique_violation, DbPool};

/// Input for creating a new client.
#[derive(Debug, Clone)]
pub struct CreateClient {
    pub name: String,
    pub client_type: ClientType,
    pub folder_path: String,
    pub structure_id: i64,
}

/// Create a new client. Folder paths are unique across the store.
pub async fn create_client<'e, E>(executor: E, input: CreateClient) -> Result<Client>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (name, type, folder_path, structure_id, created_date)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(input.client_type.as_str())
    .bind(&input.folder_path)
    .bind(input.structure_id)
    .bind(now_timestamp())
    .fetch_one(executor)
    .await
    .map_err(|e| match unique_violation(&e) {
        Some(_) => Error::AlreadyExists(format!(
            "Client folder '{}' is already registered",
            input.folder_path
        )),
        None => Error::Database(e),
    })
}

/// Get a client by ID.
pub async fn get_client<'e, E>(executor: E, id: i64) -> Result<Client>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Client not found: {}", id)))
}

/// Find a client by name within a structure.
///
/// Names are not unique by constraint, so the oldest match wins.
pub async fn find_client<'e, E>(executor: E, name: &str, structure_id: i64) -> Result<Option<Client>>
where
    E: SqliteExecutor<'e>,
{
    let client = sqlx::query_as::<_, Client>(
        "SELECT * FROM clients WHERE name = ? AND structure_id = ? ORDER BY id LIMIT 1",
    )
    .bind(name)
    .bind(structure_id)
    .fetch_optional(executor)
    .await?;

    Ok(client)
}

/// List clients, optionally restricted to one structure. Newest first.
pub async fn list_clients<'e, E>(executor: E, structure_id: Option<i64>) -> Result<Vec<Client>>
where
    E: SqliteExecutor<'e>,
{
    let clients = match structure_id {
        Some(structure_id) => {
            sqlx::query_as::<_, Client>(
                "SELECT * FROM clients WHERE structure_id = ? ORDER BY created_date DESC, id DESC",
            )
            .bind(structure_id)
            .fetch_all(executor)
            .await?
        }
        None => {
            sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_date DESC, id DESC")
                .fetch_all(executor)
                .await?
        }
    };

    Ok(clients)
}

/// Delete a client that owns no projects.
///
/// Like structures, deletion is restricted while projects remain.
pub async fn delete_client(pool: &DbPool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    get_client(&mut *tx, id).await?;

    let projects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE client_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if projects > 0 {
        return Err(Error::Conflict(format!(
            "Client {} still has {} project(s)",
            id, projects
        )));
    }

    sqlx::query("DELETE FROM clients WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(())
}
