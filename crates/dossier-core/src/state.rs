//! Shared application state.

use dossier_storage::FolderService;

use crate::config::Config;
use crate::db::{self, DbPool};
use crate::services::{FilenameService, NumberingService, ProjectService, StructureService};
use crate::Result;

/// Services wired to one database.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub folders: FolderService,
    pub numbering: NumberingService,
    pub structures: StructureService,
    pub projects: ProjectService,
    pub filenames: FilenameService,
}

impl AppState {
    /// Build state from the global configuration.
    pub async fn new() -> Result<Self> {
        Self::from_config(crate::config().clone()).await
    }

    /// Open (and if needed create) the database and wire up the services.
    pub async fn from_config(config: Config) -> Result<Self> {
        let db = db::init_pool(&config.database.path).await?;
        db::initialize_schema(&db).await?;

        let folders = FolderService::new();
        let numbering = NumberingService::new(db.clone(), config.numbering.on_malformed);
        let structures = StructureService::new(
            db.clone(),
            folders.clone(),
            config.organizer.default_root.clone(),
        );
        let projects = ProjectService::new(db.clone(), folders.clone(), numbering.clone());
        let filenames = FilenameService::new(db.clone());

        Ok(Self {
            db,
            config,
            folders,
            numbering,
            structures,
            projects,
            filenames,
        })
    }

    pub async fn stats(&self) -> Result<db::OrganizerStats> {
        db::get_stats(&self.db).await
    }
}
