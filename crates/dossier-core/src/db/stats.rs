//! Store-wide counts.

use serde::Serialize;
use sqlx::{FromRow, SqliteExecutor};

use crate::Result;

/// Summary counts shown in reports.
#[derive(Debug, Clone, Copy, PartialEq, FromRow, Serialize)]
pub struct OrganizerStats {
    pub structures: i64,
    pub clients: i64,
    pub projects: i64,
    pub generated_files: i64,
}

impl OrganizerStats {
    /// Average projects per client, 0 when there are no clients.
    pub fn projects_per_client(&self) -> f64 {
        if self.clients == 0 {
            0.0
        } else {
            self.projects as f64 / self.clients as f64
        }
    }
}

pub async fn get_stats<'e, E>(executor: E) -> Result<OrganizerStats>
where
    E: SqliteExecutor<'e>,
{
    let stats = sqlx::query_as::<_, OrganizerStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM structures) AS structures,
            (SELECT COUNT(*) FROM clients) AS clients,
            (SELECT COUNT(*) FROM projects) AS projects,
            (SELECT COUNT(*) FROM generated_files) AS generated_files
        "#,
    )
    .fetch_one(executor)
    .await?;

    Ok(stats)
}
