use std::path::{Path, PathBuf};

use regex::Regex;

use crate::errors::AppError;

/// Download filename for an exported event: whitespace runs collapsed to
/// underscores, `.ics` extension.
pub fn ical_filename(title: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap();
    format!("{}.ics", whitespace.replace_all(title, "_"))
}

/// Saves an opaque downloaded artifact under `dir`, creating the directory
/// if needed. Returns the full path written.
pub fn save_download(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::Storage(format!("create {}: {}", dir.display(), e)))?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)
        .map_err(|e| AppError::Storage(format!("write {}: {}", path.display(), e)))?;
    Ok(path)
}
