//! Project model

use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use crate::{ClientType, ProjectNumber};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            // Older stores wrote the Arabic word for "active" as the column default.
            "active" | "نشط" => Some(ProjectStatus::Active),
            "on_hold" => Some(ProjectStatus::OnHold),
            "completed" => Some(ProjectStatus::Completed),
            "archived" => Some(ProjectStatus::Archived),
            _ => None,
        }
    }
}

/// Project record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// `P_YYMM_SSS`, unique across the store
    pub project_number: String,
    pub client_id: Option<i64>,
    pub folder_path: String,
    pub status: Option<String>,
    pub created_date: String,
    pub last_modified: String,
    pub description: Option<String>,
}

impl Project {
    /// Get the typed status. A missing status counts as active.
    pub fn get_status(&self) -> Option<ProjectStatus> {
        match &self.status {
            Some(s) => ProjectStatus::from_str(s),
            None => Some(ProjectStatus::Active),
        }
    }

    /// Parse the stored project number.
    pub fn number(&self) -> Option<ProjectNumber> {
        self.project_number.parse().ok()
    }

    pub fn is_active(&self) -> bool {
        self.get_status() == Some(ProjectStatus::Active)
    }
}

/// Project joined with its owning client, as listed for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct ProjectWithClient {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub project: Project,
    pub client_name: String,
    pub client_type: String,
}

impl ProjectWithClient {
    pub fn client_type(&self) -> Option<ClientType> {
        self.client_type.parse().ok()
    }

    /// One-line summary in the form `P_2401_003 - Website (Acme)`.
    pub fn display_label(&self) -> String {
        format!(
            "{} - {} ({})",
            self.project.project_number, self.project.name, self.client_name
        )
    }
}
