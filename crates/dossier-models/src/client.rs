//! Client model

use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Kind of customer a client folder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    OfficialEntity,
    FreelanceClient,
    StudentService,
    UniversityProject,
}

impl ClientType {
    pub const ALL: [ClientType; 4] = [
        ClientType::OfficialEntity,
        ClientType::FreelanceClient,
        ClientType::StudentService,
        ClientType::UniversityProject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::OfficialEntity => "official_entity",
            ClientType::FreelanceClient => "freelance_client",
            ClientType::StudentService => "student_service",
            ClientType::UniversityProject => "university_project",
        }
    }

    /// Human readable label used in generated project summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ClientType::OfficialEntity => "Official entity",
            ClientType::FreelanceClient => "Freelance client",
            ClientType::StudentService => "Student services",
            ClientType::UniversityProject => "University project",
        }
    }

    /// University work is filed separately from paying clients.
    pub fn is_university(&self) -> bool {
        matches!(self, ClientType::UniversityProject)
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClientType {
    type Err = String;

    /// Accepts the stored names, short aliases, and the labels written by
    /// older versions of the store.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "official_entity" | "official-entity" | "official" | "جهة رسمية" => {
                Ok(ClientType::OfficialEntity)
            }
            "freelance_client" | "freelance-client" | "freelance" | "عميل حر" => {
                Ok(ClientType::FreelanceClient)
            }
            "student_service" | "student-service" | "student" | "خدمات طلابية" => {
                Ok(ClientType::StudentService)
            }
            "university_project" | "university-project" | "university" | "مشروع جامعي" => {
                Ok(ClientType::UniversityProject)
            }
            other => Err(format!("Unknown client type: {}", other)),
        }
    }
}

/// Client record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Client {
    pub id: i64,
    pub name: String,
    /// Stored client type, see [`ClientType`]
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub client_type: String,
    pub folder_path: String,
    pub structure_id: Option<i64>,
    pub created_date: String,
}

impl Client {
    /// Get the typed client type
    pub fn get_type(&self) -> Option<ClientType> {
        self.client_type.parse().ok()
    }

    /// Display label for the client type, falling back to the raw value.
    pub fn type_label(&self) -> &str {
        match self.get_type() {
            Some(t) => t.label(),
            None => &self.client_type,
        }
    }
}
