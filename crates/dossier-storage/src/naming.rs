//! Rule-based file naming.
//!
//! Builds canonical file names from a handful of fields:
//!
//! - Lectures: `Lec01_{client}_{description}.{ext}`, or
//!   `{description}_{client}.{ext}` when the description already carries a
//!   `Lec` index.
//! - Tutorials: `Tutorial_{client}_{description}_{version}.{ext}`.
//! - Everything else: `{date}_{type}_{client}_{description}_{version}.{ext}`.
//!
//! The client label loses its spaces and the description has spaces turned
//! into hyphens, so `"Admission Analysis"` becomes `Admission-Analysis`.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VERSION: &str = "v01";
pub const DEFAULT_EXTENSION: &str = "pdf";
pub const DEFAULT_LECTURE_INDEX: &str = "Lec01";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// File type categories offered for naming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    Report,
    Invoice,
    Proposal,
    Homework,
    Lecture,
    Research,
    Design,
    Tutorial,
    Presentation,
    Contract,
    Analysis,
    Other(String),
}

impl FileCategory {
    pub const KNOWN: [FileCategory; 11] = [
        FileCategory::Report,
        FileCategory::Invoice,
        FileCategory::Proposal,
        FileCategory::Homework,
        FileCategory::Lecture,
        FileCategory::Research,
        FileCategory::Design,
        FileCategory::Tutorial,
        FileCategory::Presentation,
        FileCategory::Contract,
        FileCategory::Analysis,
    ];

    /// The label written into file names.
    pub fn as_str(&self) -> &str {
        match self {
            FileCategory::Report => "Report",
            FileCategory::Invoice => "Invoice",
            FileCategory::Proposal => "Proposal",
            FileCategory::Homework => "HW",
            FileCategory::Lecture => "Lecture",
            FileCategory::Research => "Research",
            FileCategory::Design => "Design",
            FileCategory::Tutorial => "Tutorial",
            FileCategory::Presentation => "Presentation",
            FileCategory::Contract => "Contract",
            FileCategory::Analysis => "Analysis",
            FileCategory::Other(label) => label,
        }
    }

    /// Map a label to a category. Matching is exact; anything unknown is
    /// kept verbatim as [`FileCategory::Other`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::KNOWN
            .iter()
            .find(|known| known.as_str() == label)
            .cloned()
            .unwrap_or_else(|| FileCategory::Other(label.to_string()))
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A required naming field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Category,
    Label,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Category => "file type",
            Field::Label => "client/project",
            Field::Description => "brief description",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    #[error("Missing required field: {0}")]
    MissingField(Field),
}

/// Which rule produced a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingRule {
    /// Lecture whose description already starts with a `Lec` index.
    IndexedLecture,
    /// Lecture that gets the default index injected.
    Lecture,
    Tutorial,
    Dated,
}

/// Raw naming fields. Blank strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameRequest {
    #[serde(default)]
    pub date: String,
    pub category: String,
    pub label: String,
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub extension: String,
}

impl FilenameRequest {
    pub fn new(
        category: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            label: label.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}

/// A generated name and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedName {
    pub filename: String,
    pub category: String,
    pub rule: NamingRule,
}

/// Remove spaces from a client/project label.
pub fn normalize_label(label: &str) -> String {
    label.trim().replace(' ', "")
}

/// Replace spaces in a description with hyphens.
pub fn normalize_description(description: &str) -> String {
    description.trim().replace(' ', "-")
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Generate a file name, using today's local date when none is given.
pub fn generate_filename(request: &FilenameRequest) -> Result<GeneratedName, NamingError> {
    generate_filename_on(request, Local::now().date_naive())
}

/// Generate a file name with an explicit fallback date.
pub fn generate_filename_on(
    request: &FilenameRequest,
    today: NaiveDate,
) -> Result<GeneratedName, NamingError> {
    let category = request.category.trim();
    let client = normalize_label(&request.label);
    let description = normalize_description(&request.description);

    if category.is_empty() {
        return Err(NamingError::MissingField(Field::Category));
    }
    if client.is_empty() {
        return Err(NamingError::MissingField(Field::Label));
    }
    if description.is_empty() {
        return Err(NamingError::MissingField(Field::Description));
    }

    let date = or_default(&request.date, &today.format(DATE_FORMAT).to_string());
    let version = or_default(&request.version, DEFAULT_VERSION);
    let extension = or_default(request.extension.trim().trim_start_matches('.'), DEFAULT_EXTENSION);

    let (filename, rule) = match FileCategory::from_label(category) {
        FileCategory::Lecture if description.to_lowercase().starts_with("lec") => (
            format!("{}_{}.{}", description, client, extension),
            NamingRule::IndexedLecture,
        ),
        FileCategory::Lecture => (
            format!("{}_{}_{}.{}", DEFAULT_LECTURE_INDEX, client, description, extension),
            NamingRule::Lecture,
        ),
        FileCategory::Tutorial => (
            format!("Tutorial_{}_{}_{}.{}", client, description, version, extension),
            NamingRule::Tutorial,
        ),
        other => (
            format!(
                "{}_{}_{}_{}_{}.{}",
                date,
                other.as_str(),
                client,
                description,
                version,
                extension
            ),
            NamingRule::Dated,
        ),
    };

    Ok(GeneratedName {
        filename,
        category: category.to_string(),
        rule,
    })
}
