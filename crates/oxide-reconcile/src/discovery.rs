//! Definition file discovery.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SyncError;

/// Lists the definition files in `dir`, sorted by file name.
///
/// Only regular files whose extension matches `extension`
/// (case-insensitively) are returned; subdirectories are not searched.
pub async fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, SyncError> {
    let read_error = |e: std::io::Error| SyncError::DirectoryRead {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !matches {
            continue;
        }
        match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => continue,
            _ => files.push(path),
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "Discovered definition files");
    Ok(files)
}
