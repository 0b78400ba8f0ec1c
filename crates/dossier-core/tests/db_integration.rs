//! Database integration tests for dossier.
//!
//! Exercises the store queries against an in-memory SQLite database.
//! Each test builds its own schema and runs in isolation.

use dossier_core::db;
use dossier_core::Error;
use dossier_core::Result;
use dossier_models::{ClientType, ProjectStatus};
use dossier_storage::FolderTemplate;

// ============================================================================
// Test Setup Helper
// ============================================================================

/// Set up a fresh in-memory database with the schema applied.
async fn setup_test_db() -> db::DbPool {
    let pool = db::init_pool(":memory:")
        .await
        .expect("Failed to init pool");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    pool
}

/// Set up a database with one structure and one client.
async fn setup_test_db_with_client() -> (db::DbPool, i64, i64) {
    let pool = setup_test_db().await;

    let structure = db::create_structure(
        &pool,
        db::CreateStructure {
            name: "Main".to_string(),
            base_path: "/org".to_string(),
            template: FolderTemplate::new().folder_with("Docs", ["Notes"]),
        },
    )
    .await
    .expect("Failed to create test structure");

    let client = db::create_client(
        &pool,
        db::CreateClient {
            name: "Acme Corp".to_string(),
            client_type: ClientType::FreelanceClient,
            folder_path: "/org/clients/Acme_Corp".to_string(),
            structure_id: structure.id,
        },
    )
    .await
    .expect("Failed to create test client");

    (pool, structure.id, client.id)
}

fn project_input(client_id: i64, number: &str, name: &str) -> db::CreateProject {
    db::CreateProject {
        name: name.to_string(),
        project_number: number.to_string(),
        client_id,
        folder_path: format!("/org/clients/Acme_Corp/{}_{}", number, name),
        description: None,
    }
}

// ============================================================================
// Structure Tests
// ============================================================================

#[tokio::test]
async fn test_structure_create_and_get() -> Result<()> {
    let pool = setup_test_db().await;

    let structure = db::create_structure(
        &pool,
        db::CreateStructure {
            name: "Main".to_string(),
            base_path: "/org".to_string(),
            template: FolderTemplate::new().folder("Inbox").folder_with("Docs", ["Notes"]),
        },
    )
    .await?;

    assert_eq!(structure.name, "Main");
    assert!(!structure.created_date.is_empty());
    assert_eq!(structure.created_date, structure.last_modified);

    let fetched = db::get_structure(&pool, structure.id).await?;
    assert_eq!(
        fetched.structure_json()?,
        serde_json::json!({ "Inbox": [], "Docs": ["Notes"] })
    );

    let by_name = db::get_structure_by_name(&pool, "Main").await?;
    assert_eq!(by_name.map(|s| s.id), Some(structure.id));
    assert!(db::get_structure_by_name(&pool, "Other").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_structure_duplicate_name() -> Result<()> {
    let (pool, _, _) = setup_test_db_with_client().await;

    let result = db::create_structure(
        &pool,
        db::CreateStructure {
            name: "Main".to_string(),
            base_path: "/elsewhere".to_string(),
            template: FolderTemplate::new(),
        },
    )
    .await;

    assert!(matches!(result, Err(Error::AlreadyExists(_))));
    assert!(db::structure_name_exists(&pool, "Main").await?);
    assert_eq!(db::list_structures(&pool).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_structure_get_missing() -> Result<()> {
    let pool = setup_test_db().await;

    let result = db::get_structure(&pool, 99).await;
    assert!(matches!(result, Err(Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_structure_delete_is_restricted() -> Result<()> {
    let (pool, structure_id, client_id) = setup_test_db_with_client().await;

    let result = db::delete_structure(&pool, structure_id).await;
    assert!(matches!(result, Err(Error::Conflict(_))));
    assert!(db::get_structure(&pool, structure_id).await.is_ok());

    db::delete_client(&pool, client_id).await?;
    db::delete_structure(&pool, structure_id).await?;
    assert!(matches!(
        db::get_structure(&pool, structure_id).await,
        Err(Error::NotFound(_))
    ));

    Ok(())
}

// ============================================================================
// Client Tests
// ============================================================================

#[tokio::test]
async fn test_client_create_and_find() -> Result<()> {
    let (pool, structure_id, client_id) = setup_test_db_with_client().await;

    let client = db::get_client(&pool, client_id).await?;
    assert_eq!(client.name, "Acme Corp");
    assert_eq!(client.client_type, "freelance_client");
    assert_eq!(client.get_type(), Some(ClientType::FreelanceClient));
    assert_eq!(client.structure_id, Some(structure_id));

    let found = db::find_client(&pool, "Acme Corp", structure_id).await?;
    assert_eq!(found.map(|c| c.id), Some(client_id));
    assert!(db::find_client(&pool, "Acme Corp", structure_id + 1).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_client_duplicate_folder() -> Result<()> {
    let (pool, structure_id, _) = setup_test_db_with_client().await;

    let result = db::create_client(
        &pool,
        db::CreateClient {
            name: "Acme again".to_string(),
            client_type: ClientType::OfficialEntity,
            folder_path: "/org/clients/Acme_Corp".to_string(),
            structure_id,
        },
    )
    .await;

    assert!(matches!(result, Err(Error::AlreadyExists(_))));

    Ok(())
}

#[tokio::test]
async fn test_client_list_by_structure() -> Result<()> {
    let (pool, structure_id, _) = setup_test_db_with_client().await;

    let other = db::create_structure(
        &pool,
        db::CreateStructure {
            name: "Side".to_string(),
            base_path: "/side".to_string(),
            template: FolderTemplate::new(),
        },
    )
    .await?;
    db::create_client(
        &pool,
        db::CreateClient {
            name: "Uni".to_string(),
            client_type: ClientType::UniversityProject,
            folder_path: "/side/Uni".to_string(),
            structure_id: other.id,
        },
    )
    .await?;

    assert_eq!(db::list_clients(&pool, None).await?.len(), 2);
    let main = db::list_clients(&pool, Some(structure_id)).await?;
    assert_eq!(main.len(), 1);
    assert_eq!(main[0].name, "Acme Corp");

    Ok(())
}

#[tokio::test]
async fn test_client_legacy_type_label() -> Result<()> {
    let (pool, structure_id, _) = setup_test_db_with_client().await;

    sqlx::query(
        "INSERT INTO clients (name, type, folder_path, structure_id, created_date) VALUES (?, ?, ?, ?, ?)",
    )
    .bind("Ministry")
    .bind("جهة رسمية")
    .bind("/org/clients/Ministry")
    .bind(structure_id)
    .bind("2023-05-01T10:00:00")
    .execute(&pool)
    .await?;

    let client = db::find_client(&pool, "Ministry", structure_id)
        .await?
        .expect("legacy client");
    assert_eq!(client.get_type(), Some(ClientType::OfficialEntity));
    assert_eq!(client.type_label(), "Official entity");

    Ok(())
}

// ============================================================================
// Project Tests
// ============================================================================

#[tokio::test]
async fn test_project_create() -> Result<()> {
    let (pool, _, client_id) = setup_test_db_with_client().await;

    let mut input = project_input(client_id, "P_2401_001", "Logo");
    input.description = Some("New logo".to_string());
    let project = db::create_project(&pool, input).await?;

    assert_eq!(project.project_number, "P_2401_001");
    assert_eq!(project.client_id, Some(client_id));
    assert_eq!(project.status.as_deref(), Some("active"));
    assert!(project.is_active());
    assert_eq!(project.description, Some("New logo".to_string()));
    assert_eq!(project.number().map(|n| n.sequence()), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_project_duplicate_number_and_folder() -> Result<()> {
    let (pool, _, client_id) = setup_test_db_with_client().await;
    db::create_project(&pool, project_input(client_id, "P_2401_001", "Logo")).await?;

    let mut same_number = project_input(client_id, "P_2401_001", "Other");
    same_number.folder_path = "/org/clients/Acme_Corp/somewhere_else".to_string();
    let err = db::create_project(&pool, same_number).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(ref msg) if msg.contains("P_2401_001")));

    let mut same_folder = project_input(client_id, "P_2401_002", "Other");
    same_folder.folder_path = "/org/clients/Acme_Corp/P_2401_001_Logo".to_string();
    let err = db::create_project(&pool, same_folder).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(ref msg) if msg.contains("folder")));

    // Neither failed insert left a row behind
    assert_eq!(db::list_projects(&pool, None).await?.len(), 1);
    assert!(db::project_number_exists(&pool, "P_2401_001").await?);
    assert!(!db::project_number_exists(&pool, "P_2401_002").await?);

    Ok(())
}

#[tokio::test]
async fn test_project_with_client() -> Result<()> {
    let (pool, _, client_id) = setup_test_db_with_client().await;
    let project = db::create_project(&pool, project_input(client_id, "P_2401_003", "Website")).await?;

    let joined = db::get_project_with_client(&pool, project.id).await?;
    assert_eq!(joined.client_name, "Acme Corp");
    assert_eq!(joined.client_type(), Some(ClientType::FreelanceClient));
    assert_eq!(joined.display_label(), "P_2401_003 - Website (Acme Corp)");

    let listed = db::list_projects(&pool, Some(client_id)).await?;
    assert_eq!(listed.len(), 1);
    assert!(db::list_projects(&pool, Some(client_id + 1)).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_project_update() -> Result<()> {
    let (pool, _, client_id) = setup_test_db_with_client().await;
    let project = db::create_project(&pool, project_input(client_id, "P_2401_001", "Logo")).await?;

    let updated = db::update_project(
        &pool,
        project.id,
        db::UpdateProject {
            status: Some(ProjectStatus::Completed),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(updated.get_status(), Some(ProjectStatus::Completed));
    assert_eq!(updated.description, None);

    let updated = db::update_project(
        &pool,
        project.id,
        db::UpdateProject {
            description: Some("Delivered".to_string()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(updated.get_status(), Some(ProjectStatus::Completed));
    assert_eq!(updated.description.as_deref(), Some("Delivered"));

    let missing = db::update_project(&pool, 999, db::UpdateProject::default()).await;
    assert!(matches!(missing, Err(Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_project_numbers_with_prefix() -> Result<()> {
    let (pool, _, client_id) = setup_test_db_with_client().await;
    for number in ["P_2401_002", "P_2401_001", "P_2402_001", "PX2401_009"] {
        db::create_project(&pool, project_input(client_id, number, "X")).await?;
    }

    let numbers = db::list_project_numbers_with_prefix(&pool, "P_2401_").await?;
    assert_eq!(numbers, vec!["P_2401_001", "P_2401_002"]);

    Ok(())
}

#[tokio::test]
async fn test_client_delete_is_restricted() -> Result<()> {
    let (pool, _, client_id) = setup_test_db_with_client().await;
    db::create_project(&pool, project_input(client_id, "P_2401_001", "Logo")).await?;

    let result = db::delete_client(&pool, client_id).await;
    assert!(matches!(result, Err(Error::Conflict(_))));
    assert!(db::get_client(&pool, client_id).await.is_ok());

    Ok(())
}

// ============================================================================
// Generated File and Stats Tests
// ============================================================================

#[tokio::test]
async fn test_generated_files_history() -> Result<()> {
    let (pool, _, client_id) = setup_test_db_with_client().await;
    let project = db::create_project(&pool, project_input(client_id, "P_2401_001", "Logo")).await?;

    db::create_generated_file(
        &pool,
        db::CreateGeneratedFile {
            filename: "2024-01-15_Report_Acme_Summary_v01.pdf".to_string(),
            project_id: Some(project.id),
            file_type: "Report".to_string(),
            file_path: None,
        },
    )
    .await?;
    db::create_generated_file(
        &pool,
        db::CreateGeneratedFile {
            filename: "Lec01_CS101_Intro.pdf".to_string(),
            project_id: None,
            file_type: "Lecture".to_string(),
            file_path: Some("/tmp/Lec01_CS101_Intro.pdf".to_string()),
        },
    )
    .await?;

    assert_eq!(db::list_generated_files(&pool, None).await?.len(), 2);
    let for_project = db::list_generated_files(&pool, Some(project.id)).await?;
    assert_eq!(for_project.len(), 1);
    assert_eq!(for_project[0].file_type, "Report");

    Ok(())
}

#[tokio::test]
async fn test_stats() -> Result<()> {
    let pool = setup_test_db().await;
    let empty = db::get_stats(&pool).await?;
    assert_eq!(empty.projects, 0);
    assert_eq!(empty.projects_per_client(), 0.0);

    let (pool, _, client_id) = setup_test_db_with_client().await;
    db::create_project(&pool, project_input(client_id, "P_2401_001", "A")).await?;
    db::create_project(&pool, project_input(client_id, "P_2401_002", "B")).await?;

    let stats = db::get_stats(&pool).await?;
    assert_eq!(stats.structures, 1);
    assert_eq!(stats.clients, 1);
    assert_eq!(stats.projects, 2);
    assert_eq!(stats.generated_files, 0);
    assert_eq!(stats.projects_per_client(), 2.0);

    Ok(())
}
