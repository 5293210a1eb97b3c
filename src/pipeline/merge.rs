//! Merge of the node files into one document with provenance headers.

use super::diagnostics::{Diagnostics, FileOutcome, Stage};
use super::listing::{display_name, files_with_suffix};
use crate::error::PipelineError;
use std::path::{Path, PathBuf};

/// Suffix of node input files.
pub const NODE_SUFFIX: &str = ".txt";

/// Header line introducing one source file's block.
pub fn provenance_header(file_name: &str) -> String {
    format!("# === {} ===", file_name)
}

/// Build the merged document text for every `*.txt` file in `nodes_dir`.
///
/// Files are taken in name order. Each non-empty file yields its header, its trimmed content
/// and a blank line; files that trim to nothing are left out.
pub fn merge_nodes(nodes_dir: &Path, diagnostics: &mut Diagnostics) -> (String, usize) {
    let mut parts: Vec<String> = Vec::new();
    let mut merged_files = 0usize;

    for listed in files_with_suffix(nodes_dir, NODE_SUFFIX) {
        let Some(path) = diagnostics.take(Stage::Merge, listed) else {
            continue;
        };
        let outcome = FileOutcome::from_result(&path, std::fs::read_to_string(&path));
        let Some(content) = diagnostics.take(Stage::Merge, outcome) else {
            continue;
        };
        let trimmed = content.trim();
        if trimmed.is_empty() {
            tracing::debug!(path = %path.display(), "Skipping empty node file");
            continue;
        }
        parts.push(provenance_header(&display_name(&path)));
        parts.push(trimmed.to_string());
        parts.push(String::new());
        merged_files += 1;
    }

    (parts.join("\n"), merged_files)
}

/// Merge `nodes_dir` into `output_file`, overwriting it, and return the written path.
pub fn write_merged(
    nodes_dir: &Path,
    output_file: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<PathBuf, PipelineError> {
    tracing::info!(nodes_dir = %nodes_dir.display(), "Merging node files");
    let (document, merged_files) = merge_nodes(nodes_dir, diagnostics);

    if let Some(parent) = output_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    std::fs::write(output_file, document).map_err(|e| PipelineError::io(output_file, e))?;

    tracing::info!(path = %output_file.display(), files = merged_files, "Wrote merged document");
    Ok(output_file.to_path_buf())
}
