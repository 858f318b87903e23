use std::path::PathBuf;

pub const DEFAULT_MENU_PATH: &str = "menu.csv";
pub const DEFAULT_RATINGS_DIR: &str = "ratings";

/// Input locations for a report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub menu_path: PathBuf,
    pub ratings_dir: PathBuf,
}

impl ReportConfig {
    pub fn new(menu_path: impl Into<PathBuf>, ratings_dir: impl Into<PathBuf>) -> Self {
        ReportConfig {
            menu_path: menu_path.into(),
            ratings_dir: ratings_dir.into(),
        }
    }
}

