//! Configuration management for dossier.
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Tests and embedders can build a [`Config`] directly instead.

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::services::numbering::MalformedPolicy;

const DEFAULT_LOG_FILTER: &str = "dossier=info,dossier_core=info,dossier_storage=info";

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Initialize configuration (call once at startup)
pub fn init() -> &'static Config {
    config()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub numbering: NumberingConfig,
    pub organizer: OrganizerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct NumberingConfig {
    /// What to do when a stored project number in the current month cannot
    /// be parsed.
    pub on_malformed: MalformedPolicy,
}

#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// Base path used when a structure is created without an explicit one.
    pub default_root: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter used when RUST_LOG is not set.
    pub default_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database: DatabaseConfig {
                path: env_or("DOSSIER_DATABASE_PATH", "./data/dossier.db"),
            },
            numbering: NumberingConfig {
                on_malformed: if env_flag("DOSSIER_STRICT_NUMBERING") {
                    MalformedPolicy::Fail
                } else {
                    MalformedPolicy::Reset
                },
            },
            organizer: OrganizerConfig {
                default_root: env::var("DOSSIER_DEFAULT_ROOT")
                    .ok()
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from),
            },
            log: LogConfig {
                default_filter: env_or("DOSSIER_LOG", DEFAULT_LOG_FILTER),
            },
        }
    }

    /// Configuration for a given database path with every other setting at
    /// its default. Does not read the environment.
    pub fn for_database(path: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig { path: path.into() },
            numbering: NumberingConfig {
                on_malformed: MalformedPolicy::Reset,
            },
            organizer: OrganizerConfig { default_root: None },
            log: LogConfig {
                default_filter: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> bool {
    env::var(key)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
