//! The fixed folder layout used by organized trees.
//!
//! Folder names are literal and must match trees created by earlier
//! versions, including their bilingual suffixes.

use std::path::{Path, PathBuf};

use crate::template::{validate_name, FolderTemplate};
use crate::Result;

pub const WORK_AND_STUDY_DIR: &str = "10_Work_&_Study_العمل_والدراسة";
pub const CLIENTS_DIR: &str = "11_Clients_العملاء";
pub const UNIVERSITY_DIR: &str = "12_University_الجامعة";

/// Subfolders every project folder receives.
pub const PROJECT_SUBFOLDERS: [&str; 4] = [
    "01_Admin",
    "02_Input_&_Refs",
    "03_Working_Files",
    "04_Exports_&_Deliverables",
];

/// Name of the summary file written into each project folder.
pub const PROJECT_README: &str = "README.md";

/// The standard top-level structure materialized for a new organizer root.
pub fn default_structure() -> FolderTemplate {
    FolderTemplate::new()
        .folder("00_Inbox_صندوق_الوارد")
        .nested(
            WORK_AND_STUDY_DIR,
            FolderTemplate::new().folder(CLIENTS_DIR).folder(UNIVERSITY_DIR),
        )
        .nested(
            "20_Knowledge_Base_قاعدة_المعرفة",
            FolderTemplate::new()
                .folder_with("21_Courses_الكورسات", ["2023", "2024"])
                .folder_with("22_Tutorials_شروحاتي", ["01_Scripts_&_Notes", "02_Final_Videos"])
                .folder_with(
                    "23_Resources_الموارد",
                    [
                        "Books_&_Articles",
                        "Code_Snippets",
                        "Stock_Media",
                        "Templates_القوالب",
                        "Software_&_Tools",
                    ],
                )
                .folder_with("24_Portfolio_نماذج_الأعمال", ["Web", "Apps", "Graphics"]),
        )
        .nested(
            "30_Admin_&_Finance_الإدارة_والمالية",
            FolderTemplate::new()
                .folder_with("31_Invoices_الفواتير", ["2023", "2024"])
                .folder("32_Proposals_&_Contracts")
                .folder("33_Receipts_الإيصالات")
                .folder("34_Reports_تقارير_مالية"),
        )
        .folder_with(
            "40_Personal_شخصي",
            [
                "CV_&_CoverLetters",
                "ID_&_Documents",
                "Goals_&_Planning",
                "Personal_Projects",
            ],
        )
        .nested(
            "99_Archive_الأرشيف",
            FolderTemplate::new()
                .folder_with("Work_Archive", ["2023"])
                .folder_with("Study_Archive", ["2022"]),
        )
}

/// Turn a display name into a folder name: trimmed, spaces become `_`.
pub fn folder_component(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// [`folder_component`], rejected unless it is a single path component.
pub fn checked_component(name: &str) -> Result<String> {
    let component = folder_component(name);
    validate_name(&component)?;
    Ok(component)
}

/// Folder that holds client folders of the given kind.
pub fn client_parent(base: &Path, university: bool) -> PathBuf {
    let group = if university { UNIVERSITY_DIR } else { CLIENTS_DIR };
    base.join(WORK_AND_STUDY_DIR).join(group)
}

/// `{number}_{name}` with spaces in the name replaced by `_`.
pub fn project_folder_name(project_number: &str, project_name: &str) -> String {
    format!("{}_{}", project_number, folder_component(project_name))
}
