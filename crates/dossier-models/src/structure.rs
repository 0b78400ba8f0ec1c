//! Structure model

use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// A named folder template that has been materialized at a base path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Structure {
    pub id: i64,
    pub name: String,
    pub base_path: String,
    /// JSON encoding of the template description
    pub structure_data: String,
    pub created_date: String,
    pub last_modified: String,
}

impl Structure {
    /// Parse the stored template body as JSON.
    pub fn structure_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.structure_data)
    }
}
