//! Dossier - client and project folder organizer
//!
//! Library exports for the CLI, tests and embedders.

pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

pub use config::config;
pub use error::{Error, Result};
pub use state::AppState;
