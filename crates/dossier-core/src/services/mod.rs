//! Service layer for dossier.
//!
//! Workflows built on the store and the filesystem helpers:
//! - Numbering (monthly project numbers)
//! - Structures (template materialization)
//! - Projects (client and project folders)
//! - Filenames (name generation and audit trail)

mod filenames;
pub mod numbering;
mod projects;
mod structures;

pub use filenames::FilenameService;
pub use numbering::{next_project_number, MalformedPolicy, NumberingService};
pub use projects::{ClientRef, CreatedProject, NewProject, ProjectService};
pub use structures::StructureService;
