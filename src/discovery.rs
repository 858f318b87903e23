//! Finds rating-series files and derives a person's name from each filename.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ReportError;

/// One person's rating file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesFile {
    pub person: String,
    pub path: PathBuf,
}

/// Lists every regular file in `dir`, sorted by file name.
pub fn discover_series(dir: &Path) -> Result<Vec<SeriesFile>, ReportError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| ReportError::io(dir, e))? {
        let entry = entry.map_err(|e| ReportError::io(dir, e))?;
        let path = entry.path();

        if !path.is_file() {
            debug!(path = %path.display(), "Skipping non-file entry");
            continue;
        }

        files.push((entry.file_name(), path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(files
        .into_iter()
        .map(|(name, path)| SeriesFile {
            person: person_name(&name.to_string_lossy()),
            path,
        })
        .collect())
}

/// `"mary jane.csv"` becomes `"Mary Jane"`.
pub fn person_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    title_case(&stem)
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;

    for c in s.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = is_separator(c);
    }

    out
}

fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}
