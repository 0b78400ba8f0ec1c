//! Data models for dossier.
//!
//! Defines the records persisted by the organizer store (structures,
//! clients, projects and generated file names) together with the small
//! typed vocabularies they use.
//!
//! This crate can be used with or without sqlx support:
//! - Default: No database dependencies, pure data structures
//! - With `sqlx` feature: Adds `FromRow` derive for database mapping

mod client;
mod generated_file;
mod project;
mod project_number;
mod structure;

pub use client::*;
pub use generated_file::*;
pub use project::*;
pub use project_number::*;
pub use structure::*;

use chrono::{SecondsFormat, Utc};

/// Current UTC timestamp in the text form stored in the database.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
