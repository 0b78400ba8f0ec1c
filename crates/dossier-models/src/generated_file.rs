//! Generated file audit model

use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Audit record of a file name produced by the naming rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct GeneratedFile {
    pub id: i64,
    pub filename: String,
    pub project_id: Option<i64>,
    pub file_type: String,
    pub created_date: String,
    /// Where the file was written, when known
    pub file_path: Option<String>,
}
