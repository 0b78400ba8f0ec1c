//! Client and project workflow.
//!
//! Creating a project resolves (or creates) its client inside a structure,
//! takes the next project number, lays out the project folder on disk and
//! records everything in one transaction. The numbering lock is held from
//! the moment the number is computed until that transaction commits.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use dossier_models::{Client, ClientType, Project, ProjectNumber, ProjectWithClient, Structure};
use dossier_storage::{layout, FolderService, ProjectSummary};
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::db::{self, CreateClient, CreateProject, DbPool, UpdateProject};
use crate::services::numbering::{next_project_number, NumberingService};
use crate::{Error, Result};

/// Which client a new project belongs to.
#[derive(Debug, Clone)]
pub enum ClientRef {
    /// A client already recorded in the structure.
    Existing(i64),
    /// A client by name; reused if the structure already has one with this
    /// name, created otherwise.
    New { name: String, client_type: ClientType },
}

/// Input for [`ProjectService::create_project`].
#[derive(Debug, Clone)]
pub struct NewProject {
    pub structure_id: i64,
    pub client: ClientRef,
    pub name: String,
    /// Explicit number in `P_YYMM_SSS` form. Allocated when absent.
    pub project_number: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedProject {
    pub project: Project,
    pub client: Client,
    pub folder: PathBuf,
}

#[derive(Clone)]
pub struct ProjectService {
    db: DbPool,
    folders: FolderService,
    numbering: NumberingService,
}

impl ProjectService {
    pub fn new(db: DbPool, folders: FolderService, numbering: NumberingService) -> Self {
        Self {
            db,
            folders,
            numbering,
        }
    }

    /// Create a project dated today (local calendar).
    pub async fn create_project(&self, input: NewProject) -> Result<CreatedProject> {
        self.create_project_on(input, Local::now().date_naive()).await
    }

    /// Create a project as of `today`, which picks the numbering month and
    /// the date written to the README.
    pub async fn create_project_on(&self, input: NewProject, today: NaiveDate) -> Result<CreatedProject> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::Validation("Project name is required".to_string()));
        }
        folder_name(&name)?;
        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let requested_number = match input.project_number.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<ProjectNumber>().map_err(|e| {
                Error::Validation(format!("Invalid project number '{}': {}", raw, e))
            })?),
            _ => None,
        };
        if let ClientRef::New { name: client_name, .. } = &input.client {
            if client_name.trim().is_empty() {
                return Err(Error::Validation("Client name is required".to_string()));
            }
            folder_name(client_name)?;
        }

        let structure = db::get_structure(&self.db, input.structure_id).await?;

        let _reservation = self.numbering.reserve().await;
        let mut tx = self.db.begin().await?;

        let number = match requested_number {
            Some(number) => {
                if db::project_number_exists(&mut *tx, &number.to_string()).await? {
                    return Err(Error::AlreadyExists(format!(
                        "Project number '{}' already exists",
                        number
                    )));
                }
                number
            }
            None => next_project_number(&mut *tx, today, self.numbering.policy()).await?,
        };
        let number = number.to_string();

        let client = self.resolve_client(&mut *tx, &structure, input.client).await?;

        let summary = ProjectSummary {
            project_name: name.clone(),
            project_number: number.clone(),
            client_name: client.name.clone(),
            client_type: client.type_label().to_string(),
            created: today,
            description: description.clone(),
        };
        let folder = self
            .folders
            .create_project_folder(Path::new(&client.folder_path), &summary)
            .await?;

        let project = db::create_project(
            &mut *tx,
            CreateProject {
                name,
                project_number: number,
                client_id: client.id,
                folder_path: folder.to_string_lossy().into_owned(),
                description,
            },
        )
        .await?;
        tx.commit().await?;

        info!(
            project_id = project.id,
            project_number = %project.project_number,
            client_id = client.id,
            "Project created"
        );

        Ok(CreatedProject {
            project,
            client,
            folder,
        })
    }

    async fn resolve_client(
        &self,
        conn: &mut SqliteConnection,
        structure: &Structure,
        client: ClientRef,
    ) -> Result<Client> {
        match client {
            ClientRef::Existing(id) => {
                let client = db::get_client(&mut *conn, id).await?;
                if client.structure_id != Some(structure.id) {
                    return Err(Error::Validation(format!(
                        "Client {} does not belong to structure '{}'",
                        id, structure.name
                    )));
                }
                Ok(client)
            }
            ClientRef::New { name, client_type } => {
                let name = name.trim();
                if let Some(existing) = db::find_client(&mut *conn, name, structure.id).await? {
                    debug!(client_id = existing.id, "Reusing existing client");
                    return Ok(existing);
                }

                let folder = self
                    .folders
                    .create_client_folder(
                        Path::new(&structure.base_path),
                        name,
                        client_type.is_university(),
                    )
                    .await?;

                let client = db::create_client(
                    &mut *conn,
                    CreateClient {
                        name: name.to_string(),
                        client_type,
                        folder_path: folder.to_string_lossy().into_owned(),
                        structure_id: structure.id,
                    },
                )
                .await?;
                info!(client_id = client.id, name = %client.name, "Client created");
                Ok(client)
            }
        }
    }

    /// Change a project's status and/or description.
    pub async fn update_project(&self, id: i64, update: UpdateProject) -> Result<Project> {
        let update = UpdateProject {
            status: update.status,
            description: update.description.map(|d| d.trim().to_string()),
        };
        let project = db::update_project(&self.db, id, update).await?;
        info!(project_id = id, status = ?project.status, "Project updated");
        Ok(project)
    }

    pub async fn get_project(&self, id: i64) -> Result<ProjectWithClient> {
        db::get_project_with_client(&self.db, id).await
    }

    pub async fn find_by_number(&self, project_number: &str) -> Result<Option<Project>> {
        db::get_project_by_number(&self.db, project_number.trim()).await
    }

    pub async fn list_projects(&self, client_id: Option<i64>) -> Result<Vec<ProjectWithClient>> {
        db::list_projects(&self.db, client_id).await
    }

    pub async fn list_clients(&self, structure_id: Option<i64>) -> Result<Vec<Client>> {
        db::list_clients(&self.db, structure_id).await
    }

    /// Remove a client record. Refused while it still has projects.
    pub async fn delete_client(&self, id: i64) -> Result<()> {
        db::delete_client(&self.db, id).await?;
        info!(client_id = id, "Client deleted");
        Ok(())
    }
}

/// Names end up as folder names and must stay inside their parent.
fn folder_name(name: &str) -> Result<()> {
    layout::checked_component(name)
        .map(|_| ())
        .map_err(|_| Error::Validation(format!("'{}' cannot be used as a folder name", name.trim())))
}
