//! Database layer for dossier.
//!
//! Provides SQLite connection pooling and query modules for structures,
//! clients, projects and generated file names. Every query function takes
//! any SQLite executor, so it can run on the pool or inside a transaction.

mod clients;
mod generated_files;
mod pool;
mod projects;
mod stats;
mod structures;

// Re-export all query modules
pub use clients::*;
pub use generated_files::*;
pub use pool::*;
pub use projects::*;
pub use stats::*;
pub use structures::*;

use crate::Result;
use tracing::info;

/// Type alias for the SQLite connection pool.
pub type DbPool = sqlx::SqlitePool;

/// Initialize the database connection pool.
///
/// Creates parent directories if needed. An in-memory path gets a single
/// connection so every query sees the same database.
pub async fn init_pool(path: &str) -> Result<DbPool> {
    let config = if path == ":memory:" {
        PoolConfig::test()
    } else {
        PoolConfig::default()
    };
    let pool = create_pool_with_config(path, config).await?;

    info!("Database pool initialized: {}", path);

    Ok(pool)
}

/// Initialize the database schema.
///
/// Applies the complete schema from schema.sql. Uses IF NOT EXISTS
/// clauses so it's safe to run multiple times, including against stores
/// written by earlier versions.
pub async fn initialize_schema(pool: &DbPool) -> Result<()> {
    let schema = include_str!("../../schema.sql");

    info!("Initializing database schema");

    // Split by semicolons and execute each statement
    for statement in schema.split(';') {
        // Strip comment lines, keeping only actual SQL
        let clean_stmt: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let clean_stmt = clean_stmt.trim();
        if clean_stmt.is_empty() {
            continue;
        }
        sqlx::query(clean_stmt).execute(pool).await?;
    }

    info!("Database schema initialized successfully");

    Ok(())
}

/// Column named by a UNIQUE constraint failure, e.g. `projects.folder_path`.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Some(
            db_err
                .message()
                .rsplit(": ")
                .next()
                .unwrap_or_default()
                .to_string(),
        ),
        _ => None,
    }
}
