//! Flat directory listings filtered by file-name suffix.

use super::diagnostics::FileOutcome;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Entries directly inside `dir` whose names end with `suffix`, sorted by file name.
///
/// Regular files and symlinks to regular files list as [`FileOutcome::Read`]. A matching entry
/// that cannot be inspected (a dangling symlink, a failed stat) lists as
/// [`FileOutcome::Skipped`] so the caller can record it. A missing directory lists as empty.
pub fn files_with_suffix(dir: &Path, suffix: &str) -> Vec<FileOutcome<PathBuf>> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                match e.path().filter(|p| display_name(p).ends_with(suffix)) {
                    Some(path) => files.push(FileOutcome::Skipped {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    }),
                    None => tracing::warn!(
                        dir = %dir.display(),
                        error = %e,
                        "Failed to list directory entry"
                    ),
                }
                continue;
            }
        };
        if !entry.file_name().to_string_lossy().ends_with(suffix) {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_file() {
            files.push(FileOutcome::Read(entry.into_path()));
        } else if file_type.is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(meta) if meta.is_file() => files.push(FileOutcome::Read(entry.into_path())),
                Ok(_) => {}
                Err(e) => files.push(FileOutcome::Skipped {
                    path: entry.into_path(),
                    reason: e.to_string(),
                }),
            }
        }
    }
    files
}

/// Paths of the readable entries only.
pub fn readable(outcomes: Vec<FileOutcome<PathBuf>>) -> Vec<PathBuf> {
    outcomes.into_iter().filter_map(FileOutcome::ok).collect()
}

/// File name of `path` as UTF-8, lossily.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
