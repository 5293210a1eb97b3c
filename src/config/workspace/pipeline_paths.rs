//! Fixed filesystem layout of a pipeline run.

use super::directories::base_parent;
use std::path::{Path, PathBuf};

pub const NODES_DIR: &str = "nodes";
pub const OUTPUT_DIR: &str = "output";
pub const MARKER_FILE: &str = ".last_hash";
pub const MERGED_FILE: &str = "hb.txt";
pub const REPORT_FILE: &str = "REPORT.md";

/// Paths every stage reads or writes, derived from the base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub base_dir: PathBuf,
    /// `<parent>/nodes`
    pub nodes_dir: PathBuf,
    /// `<base>/.last_hash`
    pub marker_file: PathBuf,
    /// `<base>/output`
    pub output_dir: PathBuf,
}

impl PipelinePaths {
    pub fn from_base(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            nodes_dir: base_parent(base_dir).join(NODES_DIR),
            marker_file: base_dir.join(MARKER_FILE),
            output_dir: base_dir.join(OUTPUT_DIR),
        }
    }

    pub fn merged_file(&self) -> PathBuf {
        self.output_dir.join(MERGED_FILE)
    }

    pub fn report_file(&self) -> PathBuf {
        self.output_dir.join(REPORT_FILE)
    }
}
