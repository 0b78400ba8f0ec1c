//! Error types for dossier.
//!
//! Uses thiserror for ergonomic error definitions. Every variant maps to a
//! stable machine-readable code for callers that render failures.

use dossier_storage::naming::NamingError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Naming(#[from] NamingError),

    // Numbering errors
    #[error("Malformed project number in store: {0}")]
    MalformedProjectNumber(String),

    #[error("No project numbers left for {0}")]
    SequenceExhausted(String),

    // External errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] dossier_storage::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) | Self::Naming(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::MalformedProjectNumber(_) => "MALFORMED_PROJECT_NUMBER",
            Self::SequenceExhausted(_) => "SEQUENCE_EXHAUSTED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) | Self::Io(_) => "FILESYSTEM_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Other(_) => "ERROR",
        }
    }

    /// True for failures reported before any side effect happened.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidInput(_) | Self::Naming(_)
        )
    }
}
