//! File name generation with an optional audit trail.

use chrono::NaiveDate;
use dossier_models::GeneratedFile;
use dossier_storage::naming::{self, FilenameRequest, GeneratedName};
use tracing::info;

use crate::db::{self, CreateGeneratedFile, DbPool};
use crate::{Error, Result};

#[derive(Clone)]
pub struct FilenameService {
    db: DbPool,
}

impl FilenameService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Build a file name, falling back to today's local date.
    ///
    /// Nothing is recorded; call [`FilenameService::save`] for that.
    pub fn generate(&self, request: &FilenameRequest) -> Result<GeneratedName> {
        Ok(naming::generate_filename(request)?)
    }

    pub fn generate_on(&self, request: &FilenameRequest, today: NaiveDate) -> Result<GeneratedName> {
        Ok(naming::generate_filename_on(request, today)?)
    }

    /// Client label for a project: its client's name with spaces removed.
    pub async fn label_for_project(&self, project_id: i64) -> Result<String> {
        let project = db::get_project_with_client(&self.db, project_id).await?;
        Ok(naming::normalize_label(&project.client_name))
    }

    /// Record a generated name, optionally against a project.
    pub async fn save(
        &self,
        filename: &str,
        project_id: Option<i64>,
        file_type: &str,
        file_path: Option<&str>,
    ) -> Result<GeneratedFile> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(Error::Validation("File name is required".to_string()));
        }
        if let Some(id) = project_id {
            db::get_project(&self.db, id).await?;
        }

        let file = db::create_generated_file(
            &self.db,
            CreateGeneratedFile {
                filename: filename.to_string(),
                project_id,
                file_type: file_type.trim().to_string(),
                file_path: file_path.map(str::to_string),
            },
        )
        .await?;

        info!(file_id = file.id, filename = %file.filename, project_id = ?project_id, "File name saved");
        Ok(file)
    }

    pub async fn history(&self, project_id: Option<i64>) -> Result<Vec<GeneratedFile>> {
        db::list_generated_files(&self.db, project_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_storage::naming::{Field, NamingError};

    async fn service() -> FilenameService {
        let pool = db::init_pool(":memory:").await.unwrap();
        db::initialize_schema(&pool).await.unwrap();
        FilenameService::new(pool)
    }

    #[tokio::test]
    async fn test_generate_reports_missing_field() {
        let service = service().await;
        let request = FilenameRequest::new("Report", "", "Summary");

        let err = service.generate(&request).unwrap_err();
        assert!(matches!(
            err,
            Error::Naming(NamingError::MissingField(Field::Label))
        ));
        assert_eq!(err.to_string(), "Missing required field: client/project");
    }

    #[tokio::test]
    async fn test_save_without_project() {
        let service = service().await;
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let name = service
            .generate_on(&FilenameRequest::new("Invoice", "Acme", "January"), today)
            .unwrap();

        let saved = service.save(&name.filename, None, &name.category, None).await.unwrap();
        assert_eq!(saved.filename, "2024-01-15_Invoice_Acme_January_v01.pdf");
        assert_eq!(saved.project_id, None);

        let history = service.history(None).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_blank_name_and_unknown_project() {
        let service = service().await;

        let err = service.save("  ", None, "Report", None).await.unwrap_err();
        assert!(err.is_validation());

        let err = service.save("a.pdf", Some(42), "Report", None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(service.history(None).await.unwrap().is_empty());
    }
}
