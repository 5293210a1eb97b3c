//! DirectoriesConfig and directory-tree initialization.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Logical directory name to relative path, as written in `config.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoriesConfig {
    pub entries: BTreeMap<String, String>,
}

impl DirectoriesConfig {
    /// Resolve every entry against the base directory.
    pub fn resolve_paths(&self, base_dir: &Path) -> Vec<(String, PathBuf)> {
        self.entries
            .iter()
            .map(|(name, rel)| (name.clone(), resolve_relative(base_dir, rel)))
            .collect()
    }
}

/// Parent of the base directory; the base itself when it has none.
pub fn base_parent(base_dir: &Path) -> PathBuf {
    base_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.to_path_buf())
}

/// `./x` resolves under the base, `../x` under the base's parent, anything else under the base.
pub fn resolve_relative(base_dir: &Path, rel: &str) -> PathBuf {
    if let Some(rest) = rel.strip_prefix("./") {
        base_dir.join(rest)
    } else if let Some(rest) = rel.strip_prefix("../") {
        base_parent(base_dir).join(rest)
    } else {
        base_dir.join(rel)
    }
}

/// Create every configured directory and return the paths, in name order.
///
/// Runs before logging is up; the caller logs the returned list.
pub fn init_directories(
    directories: &DirectoriesConfig,
    base_dir: &Path,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut created = Vec::new();
    for (_, path) in directories.resolve_paths(base_dir) {
        std::fs::create_dir_all(&path).map_err(|e| PipelineError::io(&path, e))?;
        created.push(path);
    }
    Ok(created)
}
