//! Filesystem side of dossier.
//!
//! Materializes folder templates, creates client and project folders, and
//! writes the per-project summary file. A project folder looks like:
//!
//! ```text
//! P_2401_003_Logo_Design/
//!   01_Admin/
//!   02_Input_&_Refs/
//!   03_Working_Files/
//!   04_Exports_&_Deliverables/
//!   README.md
//! ```
//!
//! All directory creation is "create if missing", so every operation can be
//! repeated safely. Nothing is rolled back on failure: directories created
//! before an error stay on disk.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

mod error;
pub mod layout;
pub mod naming;
pub mod template;

pub use error::{Error, Result};
pub use template::{FolderTemplate, TemplateNode};

/// Metadata written into a project's README.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_name: String,
    pub project_number: String,
    pub client_name: String,
    pub client_type: String,
    pub created: NaiveDate,
    pub description: Option<String>,
}

impl ProjectSummary {
    /// Render the markdown summary stored in the project folder.
    pub fn render(&self) -> String {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        format!(
            "# {name}\n\
             \n\
             ## Project information\n\
             - **Client:** {client}\n\
             - **Client type:** {client_type}\n\
             - **Project number:** {number}\n\
             - **Created:** {created}\n\
             - **Description:** {description}\n\
             \n\
             ## Folder layout\n\
             - **01_Admin:** quotes, contracts, invoices\n\
             - **02_Input_&_Refs:** material from the client, references\n\
             - **03_Working_Files:** editable source files (PSD, AI, FIG)\n\
             - **04_Exports_&_Deliverables:** final exports (JPG, PDF, PNG)\n\
             \n\
             ## Notes\n\
             {notes}\n",
            name = self.project_name,
            client = self.client_name,
            client_type = self.client_type,
            number = self.project_number,
            created = self.created.format("%Y-%m-%d"),
            description = description.unwrap_or(""),
            notes = description.unwrap_or("[Add your notes here]"),
        )
    }
}

/// Service for creating organizer folders on disk.
#[derive(Debug, Clone, Default)]
pub struct FolderService {
    // No state needed - operates on paths provided by caller
}

impl FolderService {
    pub fn new() -> Self {
        Self {}
    }

    /// Create every directory described by `template` under `base`.
    ///
    /// Existing directories are left as they are. Returns the directories
    /// in creation order.
    pub async fn materialize(&self, base: &Path, template: &FolderTemplate) -> Result<Vec<PathBuf>> {
        template.validate()?;

        let directories = template.directories(base);
        info!(
            base = %base.display(),
            directories = directories.len(),
            "Materializing folder template"
        );

        for dir in &directories {
            ensure_dir(dir).await?;
        }

        Ok(directories)
    }

    /// Create (or reuse) the folder for a client under the organizer root.
    pub async fn create_client_folder(
        &self,
        base: &Path,
        client_name: &str,
        university: bool,
    ) -> Result<PathBuf> {
        if client_name.trim().is_empty() {
            return Err(Error::InvalidInput("Client name is empty".to_string()));
        }
        let component = layout::checked_component(client_name)?;

        let folder = layout::client_parent(base, university).join(component);
        ensure_dir(&folder).await?;

        info!(folder = %folder.display(), "Client folder ready");
        Ok(folder)
    }

    /// Create a project folder with its fixed subfolders and README.
    pub async fn create_project_folder(
        &self,
        client_folder: &Path,
        summary: &ProjectSummary,
    ) -> Result<PathBuf> {
        if summary.project_name.trim().is_empty() {
            return Err(Error::InvalidInput("Project name is empty".to_string()));
        }

        let name = layout::project_folder_name(&summary.project_number, &summary.project_name);
        template::validate_name(&name)?;

        let folder = client_folder.join(name);
        ensure_dir(&folder).await?;
        for sub in layout::PROJECT_SUBFOLDERS {
            ensure_dir(&folder.join(sub)).await?;
        }

        self.write_readme(&folder, summary).await?;

        info!(
            project_number = %summary.project_number,
            folder = %folder.display(),
            "Project folder created"
        );
        Ok(folder)
    }

    /// Write the project README, replacing any previous one.
    pub async fn write_readme(&self, project_folder: &Path, summary: &ProjectSummary) -> Result<PathBuf> {
        let path = project_folder.join(layout::PROJECT_README);

        // Write to a temp file then rename so a crash never leaves half a README
        let temp_path = path.with_extension("md.tmp");
        fs::write(&temp_path, summary.render()).await?;
        fs::rename(&temp_path, &path).await?;

        debug!(path = %path.display(), "Wrote project README");
        Ok(path)
    }
}

async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await.map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Ensured directory");
    Ok(())
}
