use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::text::TextDocument;

/// Read a build file into a document, enforcing the configured size limit.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file does not exist,
/// `Error::FileTooLarge` if it exceeds the limit, or `Error::Io` otherwise.
pub fn read_build_file(path: &Path, config: &Config) -> Result<TextDocument, Error> {
    let metadata = match std::fs::metadata(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(Error::Io(e)),
        Ok(m) => m,
    };

    if metadata.len() > config.max_file_size() {
        return Err(Error::FileTooLarge {
            file: path.to_path_buf(),
            max_bytes: config.max_file_size(),
            size_bytes: metadata.len(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    return Ok(TextDocument::new(content));
}

/// Find all build files under `root`, applying the config's name and
/// include/exclude filters. Paths are relative to `root` and sorted.
///
/// # Errors
///
/// Returns `Error::Io` if a directory under `root` cannot be read.
pub fn scan(root: &Path, config: &Config) -> Result<Vec<PathBuf>, Error> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() || !config.is_build_file(entry.path()) {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();

        let relative_str = relative.to_string_lossy();
        if !config.should_scan(&relative_str) {
            tracing::debug!(path = %relative_str, "excluded by config");
            continue;
        }
        found.push(relative);
    }

    found.sort();
    return Ok(found);
}
