//! Structure workflow: materialize a folder template and record it.

use std::path::{Path, PathBuf};

use dossier_models::Structure;
use dossier_storage::{layout, FolderService, FolderTemplate};
use tracing::info;

use crate::db::{self, CreateStructure, DbPool};
use crate::{Error, Result};

/// Creates, lists and removes organizer structures.
#[derive(Clone)]
pub struct StructureService {
    db: DbPool,
    folders: FolderService,
    default_root: Option<PathBuf>,
}

impl StructureService {
    pub fn new(db: DbPool, folders: FolderService, default_root: Option<PathBuf>) -> Self {
        Self {
            db,
            folders,
            default_root,
        }
    }

    /// Materialize `template` (the standard layout when `None`) under
    /// `base_path` and record it as a structure called `name`.
    ///
    /// The name is checked before anything is written to disk. Directories
    /// created before a filesystem error stay where they are.
    pub async fn create_structure(
        &self,
        name: &str,
        base_path: Option<&Path>,
        template: Option<FolderTemplate>,
    ) -> Result<Structure> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Structure name is required".to_string()));
        }

        let base = base_path
            .map(Path::to_path_buf)
            .or_else(|| self.default_root.clone())
            .ok_or_else(|| Error::Validation("Base path is required".to_string()))?;

        let template = template.unwrap_or_else(layout::default_structure);
        template
            .validate()
            .map_err(|e| Error::Validation(e.to_string()))?;

        if db::structure_name_exists(&self.db, name).await? {
            return Err(Error::AlreadyExists(format!(
                "Structure named '{}' already exists",
                name
            )));
        }

        let created = self.folders.materialize(&base, &template).await?;

        let structure = db::create_structure(
            &self.db,
            CreateStructure {
                name: name.to_string(),
                base_path: base.to_string_lossy().into_owned(),
                template,
            },
        )
        .await?;

        info!(
            structure_id = structure.id,
            name = %structure.name,
            directories = created.len(),
            "Structure created"
        );
        Ok(structure)
    }

    /// Re-create any missing directories of a stored structure.
    pub async fn restore(&self, id: i64) -> Result<Vec<PathBuf>> {
        let structure = db::get_structure(&self.db, id).await?;
        let template = db::structure_template(&structure)?;
        let directories = self
            .folders
            .materialize(Path::new(&structure.base_path), &template)
            .await?;
        Ok(directories)
    }

    pub async fn get(&self, id: i64) -> Result<Structure> {
        db::get_structure(&self.db, id).await
    }

    pub async fn find(&self, name: &str) -> Result<Option<Structure>> {
        db::get_structure_by_name(&self.db, name.trim()).await
    }

    pub async fn list(&self) -> Result<Vec<Structure>> {
        db::list_structures(&self.db).await
    }

    /// Remove a structure record. Refused while it still has clients; the
    /// folders on disk are left alone.
    pub async fn delete(&self, id: i64) -> Result<()> {
        db::delete_structure(&self.db, id).await?;
        info!(structure_id = id, "Structure deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn service(default_root: Option<PathBuf>) -> StructureService {
        let pool = db::init_pool(":memory:").await.unwrap();
        db::initialize_schema(&pool).await.unwrap();
        StructureService::new(pool, FolderService::new(), default_root)
    }

    #[tokio::test]
    async fn test_create_default_structure() {
        let tmp = TempDir::new().unwrap();
        let service = service(None).await;

        let structure = service
            .create_structure("Main", Some(tmp.path()), None)
            .await
            .unwrap();

        assert_eq!(structure.name, "Main");
        assert!(tmp.path().join(layout::WORK_AND_STUDY_DIR).join(layout::CLIENTS_DIR).is_dir());
        let stored = db::structure_template(&structure).unwrap();
        assert_eq!(stored, layout::default_structure());
    }

    #[tokio::test]
    async fn test_duplicate_name_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let service = service(None).await;
        service
            .create_structure("Main", Some(&tmp.path().join("a")), None)
            .await
            .unwrap();

        let second = tmp.path().join("b");
        let err = service
            .create_structure("Main", Some(&second), None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::AlreadyExists(_)));
        assert!(!second.exists());
    }

    #[tokio::test]
    async fn test_missing_name_or_base_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let service = service(None).await;

        let err = service
            .create_structure("  ", Some(tmp.path()), None)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = service.create_structure("Main", None, None).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_default_root_is_used() {
        let tmp = TempDir::new().unwrap();
        let service = service(Some(tmp.path().to_path_buf())).await;

        let template = FolderTemplate::new().folder_with("Docs", ["Notes"]);
        let structure = service
            .create_structure("Small", None, Some(template))
            .await
            .unwrap();

        assert_eq!(structure.base_path, tmp.path().to_string_lossy());
        assert!(tmp.path().join("Docs").join("Notes").is_dir());
    }

    #[tokio::test]
    async fn test_restore_recreates_missing_directories() {
        let tmp = TempDir::new().unwrap();
        let service = service(None).await;
        let template = FolderTemplate::new().folder_with("Docs", ["Notes", "Drafts"]);
        let structure = service
            .create_structure("Small", Some(tmp.path()), Some(template))
            .await
            .unwrap();

        std::fs::remove_dir(tmp.path().join("Docs").join("Drafts")).unwrap();
        let restored = service.restore(structure.id).await.unwrap();

        assert_eq!(restored.len(), 3);
        assert!(tmp.path().join("Docs").join("Drafts").is_dir());
    }
}
