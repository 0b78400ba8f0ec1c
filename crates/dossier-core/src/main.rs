//! Dossier - client and project folder organizer
//!
//! Command line front end. Parses arguments, calls the services and prints
//! results; all behavior lives in the library.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dossier_core::db::UpdateProject;
use dossier_core::services::{ClientRef, NewProject};
use dossier_core::{AppState, Error, Result};
use dossier_models::{ClientType, ProjectStatus};
use dossier_storage::naming::FilenameRequest;
use dossier_storage::FolderTemplate;

#[derive(Parser)]
#[command(name = "dossier", version, about = "Organize client work into folders, numbers and file names")]
struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Materialize a folder template and record it as a structure.
    Init {
        name: String,
        /// Base directory (defaults to DOSSIER_DEFAULT_ROOT).
        #[arg(long)]
        base: Option<PathBuf>,
        /// JSON template file; the standard layout is used otherwise.
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// List structures, or re-create missing folders of one.
    Structures {
        #[arg(long, value_name = "ID")]
        restore: Option<i64>,
        #[arg(long, value_name = "ID", conflicts_with = "restore")]
        delete: Option<i64>,
    },
    /// List clients.
    Clients {
        #[arg(long, value_name = "ID")]
        structure: Option<i64>,
        #[arg(long, value_name = "ID")]
        delete: Option<i64>,
    },
    /// Preview the next project number.
    NextNumber {
        /// Date to number for (YYYY-MM-DD); today by default.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Create a project with its folders.
    Project(ProjectArgs),
    /// List projects.
    Projects {
        #[arg(long, value_name = "ID")]
        client: Option<i64>,
    },
    /// Change a project's status or description.
    Update {
        id: i64,
        #[arg(long, value_parser = parse_status)]
        status: Option<ProjectStatus>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Generate a file name.
    Filename(FilenameArgs),
    /// Show store counts.
    Stats,
}

#[derive(Args)]
struct ProjectArgs {
    #[arg(long, value_name = "ID")]
    structure: i64,
    #[arg(long)]
    name: String,
    /// Existing client id.
    #[arg(long, value_name = "ID", conflicts_with_all = ["client", "client_type"])]
    client_id: Option<i64>,
    /// Client name; reused when the structure already has it.
    #[arg(long, requires = "client_type")]
    client: Option<String>,
    #[arg(long)]
    client_type: Option<ClientType>,
    /// Explicit project number (P_YYMM_SSS).
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
struct FilenameArgs {
    #[arg(long)]
    category: String,
    /// Client/project label.
    #[arg(long, required_unless_present = "project")]
    label: Option<String>,
    /// Take the label from this project's client.
    #[arg(long, value_name = "ID")]
    project: Option<i64>,
    #[arg(long)]
    description: String,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    version: Option<String>,
    #[arg(long)]
    extension: Option<String>,
    /// Record the name in the history.
    #[arg(long)]
    save: bool,
}

fn parse_status(value: &str) -> std::result::Result<ProjectStatus, String> {
    ProjectStatus::from_str(value).ok_or_else(|| format!("unknown status '{}'", value))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = dossier_core::config::init();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.default_filter));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("error [{}]: {}", err.error_code(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let state = AppState::new().await?;
    let json = cli.json;

    match cli.command {
        Command::Init {
            name,
            base,
            template,
        } => {
            let template = match template {
                Some(path) => {
                    let body = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Cannot read template {}", path.display()))?;
                    Some(FolderTemplate::from_json(&body)?)
                }
                None => None,
            };
            let structure = state
                .structures
                .create_structure(&name, base.as_deref(), template)
                .await?;
            emit(json, &structure, || {
                format!("Created structure #{} '{}' at {}", structure.id, structure.name, structure.base_path)
            })?;
        }
        Command::Structures { restore, delete } => {
            if let Some(id) = restore {
                let dirs = state.structures.restore(id).await?;
                emit(json, &dirs, || format!("{} directories in place", dirs.len()))?;
            } else if let Some(id) = delete {
                state.structures.delete(id).await?;
                println!("Deleted structure #{}", id);
            } else {
                let structures = state.structures.list().await?;
                emit(json, &structures, || {
                    structures
                        .iter()
                        .map(|s| format!("#{}  {}  {}", s.id, s.name, s.base_path))
                        .collect::<Vec<_>>()
                        .join("\n")
                })?;
            }
        }
        Command::Clients { structure, delete } => {
            if let Some(id) = delete {
                state.projects.delete_client(id).await?;
                println!("Deleted client #{}", id);
            } else {
                let clients = state.projects.list_clients(structure).await?;
                emit(json, &clients, || {
                    clients
                        .iter()
                        .map(|c| format!("#{}  {}  ({})  {}", c.id, c.name, c.type_label(), c.folder_path))
                        .collect::<Vec<_>>()
                        .join("\n")
                })?;
            }
        }
        Command::NextNumber { date } => {
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let number = state.numbering.peek_next(today).await?.to_string();
            emit(json, &number, || number.clone())?;
        }
        Command::Project(args) => {
            let client = match (args.client_id, args.client, args.client_type) {
                (Some(id), _, _) => ClientRef::Existing(id),
                (None, Some(name), Some(client_type)) => ClientRef::New { name, client_type },
                _ => {
                    return Err(Error::InvalidInput(
                        "Either --client-id or --client with --client-type is required".to_string(),
                    ))
                }
            };
            let created = state
                .projects
                .create_project(NewProject {
                    structure_id: args.structure,
                    client,
                    name: args.name,
                    project_number: args.number,
                    description: args.description,
                })
                .await?;
            emit(json, &created, || {
                format!(
                    "Created {} for {} at {}",
                    created.project.project_number,
                    created.client.name,
                    created.folder.display()
                )
            })?;
        }
        Command::Projects { client } => {
            let projects = state.projects.list_projects(client).await?;
            emit(json, &projects, || {
                projects
                    .iter()
                    .map(|p| {
                        let status = p.project.get_status().unwrap_or_default();
                        format!("#{}  {}  [{}]", p.project.id, p.display_label(), status.as_str())
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Update {
            id,
            status,
            description,
        } => {
            let project = state
                .projects
                .update_project(id, UpdateProject { status, description })
                .await?;
            emit(json, &project, || format!("Updated {}", project.project_number))?;
        }
        Command::Filename(args) => {
            let label = match (args.label, args.project) {
                (Some(label), _) => label,
                (None, Some(id)) => state.filenames.label_for_project(id).await?,
                (None, None) => String::new(),
            };
            let mut request = FilenameRequest::new(args.category, label, args.description);
            if let Some(date) = args.date {
                request = request.date(date);
            }
            if let Some(version) = args.version {
                request = request.version(version);
            }
            if let Some(extension) = args.extension {
                request = request.extension(extension);
            }

            let generated = state.filenames.generate(&request)?;
            if args.save {
                state
                    .filenames
                    .save(&generated.filename, args.project, &generated.category, None)
                    .await?;
            }
            emit(json, &generated, || generated.filename.clone())?;
        }
        Command::Stats => {
            let stats = state.stats().await?;
            emit(json, &stats, || {
                format!(
                    "structures: {}\nclients: {}\nprojects: {}\ngenerated files: {}\nprojects per client: {:.1}",
                    stats.structures,
                    stats.clients,
                    stats.projects,
                    stats.generated_files,
                    stats.projects_per_client()
                )
            })?;
        }
    }

    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let text = text();
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}
